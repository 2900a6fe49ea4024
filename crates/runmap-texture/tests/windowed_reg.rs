//! Windowed run-length feature map regression test
//!
//! Golden values come from hand-counted runs. With 5 bins over the grey
//! range [0, 4] and the distance range [0, 4], integer grey values map to
//! their own bin and axis-aligned runs of k + 1 pixels land in length bin k.
//!
//! Covered:
//!   - output geometry (size, spacing, origin) and empty outputs
//!   - single offset vs default offsets on a uniform window
//!   - direction sensitivity on stripes
//!   - mask sensitivity and the empty-window policies
//!   - determinism and single-feature isolation
//!   - the rayon path against per-window matrices (`parallel` feature)

use runmap_core::{NdImage, NoMask};
#[cfg(feature = "parallel")]
use runmap_core::ValueMask;
use runmap_test::{RegParams, synth};
use runmap_texture::{
    EmptyWindowPolicy, FeatureMapStats, RunLengthFeature, RunLengthMapParams, TextureError,
    compute_feature_map, extract_feature, run_length_feature_map, run_length_feature_map_masked,
    window_matrix,
};
use std::sync::atomic::AtomicBool;

fn params_0_4<const D: usize>(radius: usize) -> RunLengthMapParams<D> {
    let mut p = RunLengthMapParams::new();
    p.set_radius([radius; D]);
    p.set_bins_per_axis(5).unwrap();
    p.set_pixel_value_min_max(0.0, 4.0).unwrap();
    p.set_distance_value_min_max(0.0, 4.0).unwrap();
    p
}

fn map_with<const D: usize>(
    image: &NdImage<f64, D>,
    params: &mut RunLengthMapParams<D>,
    feature: RunLengthFeature,
) -> NdImage<f64, D> {
    params.set_feature(feature);
    run_length_feature_map(image, params).unwrap().image
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn windowed_reg_geometry() {
    let mut rp = RegParams::new("windowed_geometry");

    let image = synth::uniform([5, 5], 2.0)
        .unwrap()
        .with_spacing([0.5, 2.0])
        .unwrap()
        .with_origin([10.0, -3.0])
        .unwrap();
    let map = run_length_feature_map(&image, &params_0_4(1)).unwrap();

    rp.compare_values(3.0, map.image.size()[0] as f64, 0.0);
    rp.compare_values(3.0, map.image.size()[1] as f64, 0.0);
    rp.compare_values(0.5, map.image.spacing()[0], 0.0);
    rp.compare_values(2.0, map.image.spacing()[1], 0.0);
    rp.compare_values(10.5, map.image.origin()[0], 0.0);
    rp.compare_values(-1.0, map.image.origin()[1], 0.0);
    rp.compare_values(0.0, map.image.largest_region().index()[0] as f64, 0.0);
    rp.compare_values(9.0, map.stats.pixels as f64, 0.0);

    // Shifted start index moves the origin by spacing * (start + radius)
    let shifted = synth::uniform([6, 6], 1.0).unwrap().with_start_index([3, -2]);
    let map = run_length_feature_map(&shifted, &params_0_4(1)).unwrap();
    rp.compare_values(4.0, map.image.origin()[0], 0.0);
    rp.compare_values(-1.0, map.image.origin()[1], 0.0);
    rp.compare_values(4.0, map.image.size()[0] as f64, 0.0);

    assert!(rp.cleanup(), "windowed_geometry regression test failed");
}

#[test]
fn windowed_reg_radius_too_large() {
    let image = synth::uniform([5, 5], 2.0).unwrap();

    let mut p = params_0_4::<2>(1);
    p.set_radius([2, 3]);
    let map = run_length_feature_map(&image, &p).unwrap();
    assert!(map.image.is_empty());
    assert_eq!(map.stats, FeatureMapStats::default());

    // 2r == n on one axis
    let image = synth::uniform([4, 9], 2.0).unwrap();
    p.set_radius([2, 1]);
    let map = run_length_feature_map(&image, &p).unwrap();
    assert_eq!(map.image.size(), [0, 0]);
}

#[test]
fn windowed_reg_radius_beyond_index_range() {
    // Radii whose double overflows, or that exceed the index range,
    // still give an empty map
    let image = synth::uniform([5, 5], 2.0).unwrap();
    let mut p = params_0_4::<2>(1);
    for radius in [[usize::MAX / 2 + 1, 1], [1, usize::MAX], [1 << 62, 1 << 62]] {
        p.set_radius(radius);
        let map = run_length_feature_map(&image, &p).unwrap();
        assert!(map.image.is_empty(), "radius {:?}", radius);
        assert_eq!(map.stats, FeatureMapStats::default());
    }

    // Default distance range derives from the huge window diagonal
    p.clear_distance_range();
    p.set_radius([usize::MAX, usize::MAX]);
    let map = run_length_feature_map(&image, &p).unwrap();
    assert!(map.image.is_empty());
}

// ============================================================================
// Golden values
// ============================================================================

#[test]
fn windowed_reg_uniform_single_offset() {
    let mut rp = RegParams::new("windowed_single_offset");

    let image = synth::uniform([5, 5], 2.0).unwrap();
    let mut p = params_0_4(1);
    p.set_offsets(vec![[1, 0]]).unwrap();

    // Three 3-pixel runs per window, all in grey bin 2 and length bin 2
    let cases = [
        (RunLengthFeature::ShortRunEmphasis, 1.0 / 9.0),
        (RunLengthFeature::LongRunEmphasis, 9.0),
        (RunLengthFeature::GreyLevelNonuniformity, 3.0),
        (RunLengthFeature::RunLengthNonuniformity, 3.0),
        (RunLengthFeature::LowGreyLevelRunEmphasis, 1.0 / 9.0),
        (RunLengthFeature::HighGreyLevelRunEmphasis, 9.0),
        (RunLengthFeature::ShortRunLowGreyLevelEmphasis, 1.0 / 81.0),
        (RunLengthFeature::LongRunHighGreyLevelEmphasis, 81.0),
    ];
    for (feature, expected) in cases {
        let out = map_with(&image, &mut p, feature);
        rp.compare_values(9.0, out.len() as f64, 0.0);
        rp.compare_uniform(expected, &out, 1e-12);
    }

    assert!(rp.cleanup(), "windowed_single_offset regression test failed");
}

#[test]
fn windowed_reg_uniform_default_offsets() {
    let mut rp = RegParams::new("windowed_default_offsets");

    // Per window: the two diagonals give 2 + 2 + 1 runs of 1, 2, 3 pixels
    // each (lengths 0, sqrt 2, 2 sqrt 2 -> bins 0, 1, 3), the two axes
    // give 3 + 3 runs of length 2 (bin 2). 16 runs in total.
    let image = synth::uniform([5, 5], 2.0).unwrap();
    let mut p = params_0_4::<2>(1);
    assert_eq!(p.offsets().len(), 4);

    let sre = map_with(&image, &mut p, RunLengthFeature::ShortRunEmphasis);
    rp.compare_uniform(139.0 / 384.0, &sre, 1e-12);
    let lre = map_with(&image, &mut p, RunLengthFeature::LongRunEmphasis);
    rp.compare_uniform(6.625, &lre, 1e-12);
    let rln = map_with(&image, &mut p, RunLengthFeature::RunLengthNonuniformity);
    rp.compare_uniform(4.5, &rln, 1e-12);
    let gln = map_with(&image, &mut p, RunLengthFeature::GreyLevelNonuniformity);
    rp.compare_uniform(16.0, &gln, 1e-12);

    // Single vs default offsets must differ
    p.set_offsets(vec![[1, 0]]).unwrap();
    let sre_single = map_with(&image, &mut p, RunLengthFeature::ShortRunEmphasis);
    rp.compare_uniform(1.0 / 9.0, &sre_single, 1e-12);

    assert!(rp.cleanup(), "windowed_default_offsets regression test failed");
}

#[test]
fn windowed_reg_stripes_direction() {
    let mut rp = RegParams::new("windowed_stripes");

    let image = synth::stripes_2d(5, 5, 1, [0.0, 4.0]).unwrap();
    let mut p = params_0_4(1);

    // Across the stripes every pixel is a run of its own
    p.set_offsets(vec![[1, 0]]).unwrap();
    let sre = map_with(&image, &mut p, RunLengthFeature::ShortRunEmphasis);
    rp.compare_uniform(1.0, &sre, 1e-12);
    let lre = map_with(&image, &mut p, RunLengthFeature::LongRunEmphasis);
    rp.compare_uniform(1.0, &lre, 1e-12);

    // Along the stripes each column is one run
    p.set_offsets(vec![[0, 1]]).unwrap();
    let sre = map_with(&image, &mut p, RunLengthFeature::ShortRunEmphasis);
    rp.compare_uniform(1.0 / 9.0, &sre, 1e-12);

    assert!(rp.cleanup(), "windowed_stripes regression test failed");
}

#[test]
fn windowed_reg_3d() {
    let mut rp = RegParams::new("windowed_3d");

    let image = synth::uniform([5, 5, 5], 2.0).unwrap();
    let mut p = params_0_4::<3>(1);
    assert_eq!(p.offsets().len(), 13);
    p.set_offsets(vec![[0, 0, 1]]).unwrap();

    // Nine 3-pixel runs per window
    let out = map_with(&image, &mut p, RunLengthFeature::LongRunEmphasis);
    rp.compare_values(27.0, out.len() as f64, 0.0);
    rp.compare_uniform(9.0, &out, 1e-12);
    let out = map_with(&image, &mut p, RunLengthFeature::GreyLevelNonuniformity);
    rp.compare_uniform(9.0, &out, 1e-12);

    assert!(rp.cleanup(), "windowed_3d regression test failed");
}

// ============================================================================
// Masks and empty windows
// ============================================================================

#[test]
fn windowed_reg_mask_sensitivity() {
    let mut rp = RegParams::new("windowed_mask");

    let image = synth::noise([9, 8], 5, 7).unwrap();
    let mut p = RunLengthMapParams::new();
    p.set_radius([1, 2]);

    let plain = run_length_feature_map(&image, &p).unwrap();

    // All inside: identical to no mask
    let inside = NdImage::<u8, 2>::new_with_value([9, 8], 1).unwrap();
    let masked = run_length_feature_map_masked(&image, &inside, &p).unwrap();
    rp.compare_images(&plain.image, &masked.image);

    // Custom inside value
    let inside = NdImage::<u8, 2>::new_with_value([9, 8], 7).unwrap();
    p.set_inside_value(7.0).unwrap();
    let masked = run_length_feature_map_masked(&image, &inside, &p).unwrap();
    rp.compare_images(&plain.image, &masked.image);

    // All outside: every pixel holds the sentinel
    let outside = NdImage::<u8, 2>::new([9, 8]).unwrap();
    let masked = run_length_feature_map_masked(&image, &outside, &p).unwrap();
    rp.compare_uniform(f64::NAN, &masked.image, 0.0);
    rp.compare_values(28.0, masked.stats.empty_windows as f64, 0.0);
    rp.compare_values(28.0, masked.stats.pixels as f64, 0.0);

    p.set_empty_window_policy(EmptyWindowPolicy::Sentinel(-1.0));
    let masked = run_length_feature_map_masked(&image, &outside, &p).unwrap();
    rp.compare_uniform(-1.0, &masked.image, 0.0);

    assert!(rp.cleanup(), "windowed_mask regression test failed");
}

#[test]
fn windowed_reg_strict_empty_window() {
    let image = synth::uniform([5, 5], 2.0).unwrap();
    let outside = NdImage::<u8, 2>::new([5, 5]).unwrap();
    let mut p = params_0_4(1);
    p.set_empty_window_policy(EmptyWindowPolicy::Strict);

    let err = run_length_feature_map_masked(&image, &outside, &p).unwrap_err();
    assert!(matches!(err, TextureError::EmptyWindow { .. }));

    // Values outside the grey range leave windows empty too
    let bright = synth::uniform([5, 5], 9.0).unwrap();
    let err = run_length_feature_map(&bright, &p).unwrap_err();
    assert!(matches!(err, TextureError::EmptyWindow { .. }));
}

#[test]
fn windowed_reg_masked_center() {
    // 3x3 window, centre pixel outside: the middle row splits in two
    let image = synth::uniform([3, 3], 2.0).unwrap();
    let mask = NdImage::<u8, 2>::from_fn([3, 3], |[x, y]| u8::from(x != 1 || y != 1)).unwrap();
    let mut p = params_0_4(1);
    p.set_offsets(vec![[1, 0]]).unwrap();
    p.set_feature(RunLengthFeature::ShortRunEmphasis);

    let map = run_length_feature_map_masked(&image, &mask, &p).unwrap();
    assert_eq!(map.image.size(), [1, 1]);
    assert!((map.image.data()[0] - 5.0 / 9.0).abs() < 1e-12);
}

#[test]
fn windowed_reg_mask_grid_mismatch() {
    let image = synth::uniform([5, 5], 2.0).unwrap();
    let mask = NdImage::<u8, 2>::new([4, 5]).unwrap();
    let err = run_length_feature_map_masked(&image, &mask, &params_0_4(1)).unwrap_err();
    assert_eq!(
        err,
        TextureError::MaskMismatch {
            what: "region",
            input: vec![5, 5],
            mask: vec![4, 5],
        }
    );

    // Same size, different physical placement
    let spaced = NdImage::<u8, 2>::new_with_value([5, 5], 1)
        .unwrap()
        .with_spacing([1.0, 0.5])
        .unwrap();
    let err = run_length_feature_map_masked(&image, &spaced, &params_0_4(1)).unwrap_err();
    assert!(matches!(
        err,
        TextureError::MaskMismatch { what: "spacing", .. }
    ));

    let shifted = NdImage::<u8, 2>::new_with_value([5, 5], 1)
        .unwrap()
        .with_origin([0.0, 3.0])
        .unwrap();
    let err = run_length_feature_map_masked(&image, &shifted, &params_0_4(1)).unwrap_err();
    assert!(matches!(
        err,
        TextureError::MaskMismatch { what: "origin", .. }
    ));
}

// ============================================================================
// Determinism, isolation, cancellation
// ============================================================================

#[test]
fn windowed_reg_determinism() {
    let mut rp = RegParams::new("windowed_determinism");

    let image = synth::noise([12, 10], 6, 42).unwrap();
    let mut p = RunLengthMapParams::new();
    p.set_radius([2, 1]);
    p.set_bins_per_axis(16).unwrap();

    for feature in RunLengthFeature::ALL {
        p.set_feature(feature);
        let a = run_length_feature_map(&image, &p).unwrap();
        let b = run_length_feature_map(&image, &p).unwrap();
        rp.compare_images(&a.image, &b.image);
    }

    assert!(rp.cleanup(), "windowed_determinism regression test failed");
}

#[test]
fn windowed_reg_feature_isolation() {
    let mut rp = RegParams::new("windowed_isolation");

    let image = synth::noise([9, 9], 4, 3).unwrap();
    let mut p = RunLengthMapParams::new();
    p.set_radius([2, 2]);

    let center = [4i64, 5];
    let out_index = [center[0] - 2, center[1] - 2];
    let matrix = window_matrix(&image, &NoMask, &p, &center).unwrap();

    for feature in [RunLengthFeature::ShortRunEmphasis, RunLengthFeature::LongRunEmphasis] {
        let map = map_with(&image, &mut p, feature);
        let expected = extract_feature(&matrix, feature).unwrap();
        rp.compare_values(expected, map.get(&out_index).unwrap(), 0.0);
    }

    assert!(rp.cleanup(), "windowed_isolation regression test failed");
}

#[test]
fn windowed_reg_cancelled() {
    let image = synth::noise([8, 8], 4, 1).unwrap();
    let flag = AtomicBool::new(true);
    let mut out = NdImage::<f64, 2>::new([0, 0]).unwrap();
    let err = compute_feature_map(
        &image,
        &NoMask,
        &RunLengthMapParams::new(),
        &mut out,
        Some(&flag),
    )
    .unwrap_err();
    assert_eq!(err, TextureError::Cancelled { completed_lines: 0 });
}

#[cfg(feature = "parallel")]
#[test]
fn windowed_reg_parallel_matches_window_matrices() {
    let mut rp = RegParams::new("windowed_parallel");

    let image = synth::noise([17, 13, 4], 5, 31).unwrap();
    let mask = NdImage::<u8, 3>::from_fn([17, 13, 4], |[x, y, z]| u8::from((x + y + z) % 7 != 0))
        .unwrap();
    let mut p = RunLengthMapParams::<3>::new();
    p.set_radius([2, 1, 1]);
    p.set_bins_per_axis(8).unwrap();

    for feature in [
        RunLengthFeature::ShortRunEmphasis,
        RunLengthFeature::RunLengthNonuniformity,
        RunLengthFeature::LongRunHighGreyLevelEmphasis,
    ] {
        p.set_feature(feature);
        let map = run_length_feature_map_masked(&image, &mask, &p).unwrap();
        let inside = ValueMask::new(&mask, p.inside_value());
        rp.compare_values(13.0 * 11.0 * 2.0, map.stats.pixels as f64, 0.0);

        for out_index in map.image.largest_region().iter() {
            let center = [out_index[0] + 2, out_index[1] + 1, out_index[2] + 1];
            let matrix = window_matrix(&image, &inside, &p, &center).unwrap();
            let expected = match extract_feature(&matrix, feature) {
                Ok(v) => v,
                Err(TextureError::EmptyMatrix) => f64::NAN,
                Err(e) => panic!("unexpected error {e}"),
            };
            let actual = map.image.get(&out_index).unwrap();
            let same = expected == actual || (expected.is_nan() && actual.is_nan());
            rp.compare_values(1.0, same as u8 as f64, 0.0);
        }
    }

    assert!(rp.cleanup(), "windowed_parallel regression test failed");
}
