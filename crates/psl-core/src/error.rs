use thiserror::Error;

/// Errors produced while restoring a [`crate::List`] from a selfie.
///
/// `parse`/`parse_with` never fail (malformed rule lines are silently
/// skipped), so every variant here is a selfie-decode failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("selfie magic/version tag {found} does not match the expected tag {expected}")]
    SelfieVersionMismatch { expected: u16, found: u16 },

    #[error("selfie payload is truncated or malformed")]
    SelfieMalformed,

    #[error("selfie payload is not valid UTF-8 in its encoded-bytes section")]
    SelfieEncoding,
}

pub type Result<T> = core::result::Result<T, Error>;
