#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration options for a [`Parser`](super::Parser).
///
/// # Example
///
/// ```rust
/// use squirrel::parser::ParserConfig;
///
/// // Use default configuration
/// let config = ParserConfig::default();
///
/// // Or customize it
/// let config = ParserConfig::new()
///     .with_recovery(false) // report the first failure only
///     .with_stats(true);    // collect work counters
/// assert!(!config.enable_recovery);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ParserConfig {
    /// Run the recovery phase when discovery does not match the whole input
    ///
    /// When disabled, a failed discovery phase is finalized as-is: the root is
    /// the partial match (or one syntax error over the whole input) followed by
    /// the unmatched remainder.
    pub enable_recovery: bool,

    /// Collect [`ParseStats`](super::ParseStats) for the parse
    pub collect_stats: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enable_recovery: true,
            collect_stats: false,
        }
    }

    #[must_use]
    pub const fn with_recovery(mut self, enable: bool) -> Self {
        self.enable_recovery = enable;
        self
    }

    #[must_use]
    pub const fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}
