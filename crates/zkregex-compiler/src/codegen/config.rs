//! Configuration for circuit generation.

/// Default location of `IsEqual`, `LessEqThan`, `AND` and `MultiOR`.
pub const DEFAULT_INCLUDE: &str = "@zk-email/zk-regex-circom/circuits/regex_helpers.circom";

/// Configuration for lowering and circom emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircomConfig {
    /// Version in the `pragma circom` line
    pub(crate) pragma: String,
    /// Path of the helper-template include
    pub(crate) include: String,
    /// Shortest run of consecutive bytes compiled as a range check
    pub(crate) range_threshold: usize,
    /// Constrain message bytes to be below the sentinel
    pub(crate) check_input_range: bool,
}

impl Default for CircomConfig {
    fn default() -> Self {
        Self {
            pragma: "2.1.5".to_string(),
            include: DEFAULT_INCLUDE.to_string(),
            range_threshold: 16,
            check_input_range: true,
        }
    }
}

impl CircomConfig {
    /// Create a new CircomConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the circom version in the pragma line.
    pub fn pragma(mut self, version: impl Into<String>) -> Self {
        self.pragma = version.into();
        self
    }

    /// Set the helper-template include path.
    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.include = path.into();
        self
    }

    /// Set the shortest byte run compiled as a `LessEqThan` pair. Clamped to at least 2.
    pub fn range_threshold(mut self, value: usize) -> Self {
        self.range_threshold = value.max(2);
        self
    }

    /// Set whether message bytes are range checked.
    pub fn check_input_range(mut self, value: bool) -> Self {
        self.check_input_range = value;
        self
    }
}
