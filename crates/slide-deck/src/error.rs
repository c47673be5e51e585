/// Errors raised while configuring a segmenter.
///
/// Segmentation itself never fails. These cover the values callers hand in:
/// category rule tables and strategy names read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("invalid category rule {rule:?}: expected keyword=category")]
    InvalidRule { rule: String },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown segmentation strategy: {0}")]
    UnknownStrategy(String),
}
