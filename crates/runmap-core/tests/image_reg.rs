//! N-d image regression test
//!
//! Grid bookkeeping of `NdImage`: memory order, start indices, physical
//! placement and the sink capability used by feature maps.

use runmap_core::{ImageInfo, ImageRegion, ImageSink, ImageSource, NdImage};
use runmap_test::RegParams;

#[test]
fn image_reg_memory_order_and_regions() {
    let mut rp = RegParams::new("image_order");

    let img = NdImage::<i16, 3>::from_fn([4, 3, 2], |[x, y, z]| (x + 10 * y + 100 * z) as i16)
        .unwrap();
    let region = img.largest_region();
    for (k, index) in region.iter().enumerate() {
        rp.compare_values(img.data()[k] as f64, img.value_at(&index).unwrap(), 0.0);
    }
    rp.compare_values(24.0, region.iter().len() as f64, 0.0);

    // Lines along axis 0 start on x = 0
    let starts = region.line_starts(0);
    rp.compare_values(6.0, starts.num_pixels() as f64, 0.0);
    rp.compare_values(1.0, starts.size()[0] as f64, 0.0);

    assert!(rp.cleanup(), "image_order regression test failed");
}

#[test]
fn image_reg_physical_placement() {
    let mut rp = RegParams::new("image_physical");

    let img = NdImage::<f32, 2>::new([5, 4])
        .unwrap()
        .with_spacing([0.25, 3.0])
        .unwrap()
        .with_origin([-1.0, 2.0])
        .unwrap()
        .with_start_index([2, -1]);

    let p = img.index_to_physical(&[4, 1]);
    rp.compare_values(0.0, p[0], 1e-12);
    rp.compare_values(5.0, p[1], 1e-12);

    let d = img.info().physical_distance(&[2, -1], &[6, 2]);
    rp.compare_values(82.0f64.sqrt(), d, 1e-12);

    rp.compare_values(0.0, img.value_at(&[2, -1]).unwrap(), 0.0);
    rp.compare_values(1.0, img.value_at(&[1, 0]).is_none() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "image_physical regression test failed");
}

#[test]
fn image_reg_sink_reallocates() {
    let mut rp = RegParams::new("image_sink");

    let mut out = NdImage::<f64, 2>::new_with_value([2, 2], 7.0).unwrap();
    let info = ImageInfo {
        region: ImageRegion::with_size([3, 3]),
        spacing: [2.0, 2.0],
        origin: [1.0, 1.0],
    };
    out.allocate(&info).unwrap();
    rp.compare_uniform(0.0, &out, 0.0);

    for y in 0..3 {
        out.write_line(&[0, y], &[1.0, 2.0, 3.0]).unwrap();
    }
    let expected = NdImage::<f64, 2>::from_fn([3, 3], |[x, _]| (x + 1) as f64)
        .unwrap()
        .with_spacing([2.0, 2.0])
        .unwrap()
        .with_origin([1.0, 1.0])
        .unwrap();
    rp.compare_images(&expected, &out);

    // Zero-sized grids are legal
    out.allocate(&ImageInfo::with_size([0, 0])).unwrap();
    rp.compare_values(0.0, out.len() as f64, 0.0);

    assert!(rp.cleanup(), "image_sink regression test failed");
}
