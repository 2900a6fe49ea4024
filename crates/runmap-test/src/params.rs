//! Regression test parameters and operations

use runmap_core::NdImage;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare with expected values (default)
    #[default]
    Compare,
    /// Display mode - print values, never record failures
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "windowed")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        Self::with_mode(test_name, RegTestMode::from_env())
    }

    /// Create regression test parameters with an explicit mode
    pub fn with_mode(test_name: &str, mode: RegTestMode) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record_failure(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        if self.display() {
            return true;
        }
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise. Two NaN
    /// values match.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        if expected.is_nan() && actual.is_nan() {
            return true;
        }
        let diff = (expected - actual).abs();

        if !(diff <= delta) {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.record_failure(msg)
        } else {
            if self.display() {
                eprintln!("  [{}] {} (expected {})", self.index, actual, expected);
            }
            true
        }
    }

    /// Compare two images for bit-exact equality of grid and pixels
    ///
    /// NaN pixels compare equal when their bit patterns are equal.
    pub fn compare_images<const D: usize>(
        &mut self,
        image1: &NdImage<f64, D>,
        image2: &NdImage<f64, D>,
    ) -> bool {
        self.index += 1;

        if !image1.same_grid(image2) {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - grid mismatch\n\
                 {:?} vs {:?}",
                self.test_name,
                self.index,
                image1.info(),
                image2.info()
            );
            return self.record_failure(msg);
        }

        let mismatch = image1
            .data()
            .iter()
            .zip(image2.data())
            .position(|(a, b)| a.to_bits() != b.to_bits());

        if let Some(pos) = mismatch {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - pixel mismatch at offset {} ({} vs {})",
                self.test_name,
                self.index,
                pos,
                image1.data()[pos],
                image2.data()[pos]
            );
            return self.record_failure(msg);
        }

        true
    }

    /// Compare every pixel of an image with one expected value
    pub fn compare_uniform<const D: usize>(
        &mut self,
        expected: f64,
        image: &NdImage<f64, D>,
        delta: f64,
    ) -> bool {
        self.index += 1;

        let bad = image.data().iter().position(|&v| {
            if expected.is_nan() {
                !v.is_nan()
            } else {
                !((expected - v).abs() <= delta)
            }
        });

        match bad {
            Some(pos) => {
                let msg = format!(
                    "Failure in {}_reg: uniform comparison for index {} - offset {} holds {}, expected {} (delta {})",
                    self.test_name,
                    self.index,
                    pos,
                    image.data()[pos],
                    expected,
                    delta
                );
                self.record_failure(msg)
            }
            None => true,
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
