/// A rounding mode name that is not one of the recognized spellings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rounding mode `{0}`")]
pub struct ParseRoundingModeError(pub String);
