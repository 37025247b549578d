use thiserror::Error;

/// Errors raised while reconciling a message into its wire form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Flat text and structured parts were both set and disagree
    ///
    /// A message may carry its content as `content` or as `parts`, not as
    /// two independent values. Setting both is only accepted when `parts`
    /// is the single text part equal to `content`.
    #[error("text and parts are mutually exclusive")]
    ContentConflict,
}
