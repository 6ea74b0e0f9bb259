use thiserror::Error;

/// Decode failure for a wire record.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("input truncated: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("unsupported record version {0}")]
    BadVersion(u8),

    #[error("credits {0} below the chain-commit minimum")]
    CreditsOutOfRange(u8),

    #[error("external-id section length {section} exceeds {available} available bytes")]
    ExtIdSectionOverrun { section: usize, available: usize },

    #[error("external-id lengths do not tile the declared section")]
    ExtIdLengthMismatch,
}
