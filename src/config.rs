//! Pipeline configuration.
//!
//! [`PrepConfig`] holds the constants the preparation steps share. The
//! defaults are the values the Challenge models were trained with.

/// Shared settings for loading, fold generation and batch materialization.
///
/// Override single fields with struct-update syntax:
///
/// ```
/// use ecg_prep::PrepConfig;
///
/// let cfg = PrepConfig {
///     n_folds: 5,
///     ..PrepConfig::default()
/// };
/// assert_eq!(cfg.signal_len, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepConfig {
    /// Number of stratified folds.
    ///
    /// Default: `10`.
    pub n_folds: usize,

    /// Seed of the shuffle that precedes fold assignment.
    ///
    /// Default: `42`.
    pub seed: u64,

    /// Length of the time axis after padding or truncation.
    ///
    /// Default: `5000` samples (10 s at 500 Hz).
    pub signal_len: usize,

    /// Number of leads every record must carry when materialized.
    ///
    /// Default: `12`.
    pub n_channels: usize,

    /// Extension of signal files, without the dot.
    pub signal_extension: String,

    /// Extension of the paired header files, without the dot.
    pub header_extension: String,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            n_folds: 10,
            seed: 42,
            signal_len: 5000,
            n_channels: 12,
            signal_extension: "mat".to_string(),
            header_extension: "hea".to_string(),
        }
    }
}
