//! Error codes reported by the utility context and their classification.
//!
//! The context records a [`RawErrorCode`] whenever a call fails. Nothing
//! outside this crate ever sees a raw code on its own: every failure is run
//! through [`ErrorClass::classify`] first, and only `InvalidInput` and
//! `LibraryFault` become a [`CryptoError`]. A `BadSignature` classification
//! is the routine "does not verify" answer and surfaces as `Ok(false)`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Codes the utility context can leave behind as its last error.
///
/// The set and the upper-snake names match the error table of the Olm
/// library so that codes read back from logs stay comparable across
/// implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawErrorCode {
    Success,
    NotEnoughRandom,
    OutputBufferTooSmall,
    BadMessageVersion,
    BadMessageFormat,
    BadMessageMac,
    BadMessageKeyId,
    InvalidBase64,
    BadAccountKey,
    UnknownPickleVersion,
    CorruptedPickle,
    BadSessionKey,
    UnknownMessageIndex,
    BadLegacyAccountPickle,
    BadSignature,
    InputBufferTooSmall,
    SasTheirKeyNotSet,
    PickleExtraData,
}

const CODE_NAMES: &[(RawErrorCode, &str)] = &[
    (RawErrorCode::Success, "SUCCESS"),
    (RawErrorCode::NotEnoughRandom, "NOT_ENOUGH_RANDOM"),
    (RawErrorCode::OutputBufferTooSmall, "OUTPUT_BUFFER_TOO_SMALL"),
    (RawErrorCode::BadMessageVersion, "BAD_MESSAGE_VERSION"),
    (RawErrorCode::BadMessageFormat, "BAD_MESSAGE_FORMAT"),
    (RawErrorCode::BadMessageMac, "BAD_MESSAGE_MAC"),
    (RawErrorCode::BadMessageKeyId, "BAD_MESSAGE_KEY_ID"),
    (RawErrorCode::InvalidBase64, "INVALID_BASE64"),
    (RawErrorCode::BadAccountKey, "BAD_ACCOUNT_KEY"),
    (RawErrorCode::UnknownPickleVersion, "UNKNOWN_PICKLE_VERSION"),
    (RawErrorCode::CorruptedPickle, "CORRUPTED_PICKLE"),
    (RawErrorCode::BadSessionKey, "BAD_SESSION_KEY"),
    (RawErrorCode::UnknownMessageIndex, "UNKNOWN_MESSAGE_INDEX"),
    (RawErrorCode::BadLegacyAccountPickle, "BAD_LEGACY_ACCOUNT_PICKLE"),
    (RawErrorCode::BadSignature, "BAD_SIGNATURE"),
    (RawErrorCode::InputBufferTooSmall, "INPUT_BUFFER_TOO_SMALL"),
    (RawErrorCode::SasTheirKeyNotSet, "SAS_THEIR_KEY_NOT_SET"),
    (RawErrorCode::PickleExtraData, "PICKLE_EXTRA_DATA"),
];

impl RawErrorCode {
    pub fn as_str(self) -> &'static str {
        CODE_NAMES
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, name)| *name)
            .unwrap_or("UNKNOWN_ERROR")
    }
}

impl fmt::Display for RawErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised error code name: {0}")]
pub struct UnknownCodeName(pub String);

impl FromStr for RawErrorCode {
    type Err = UnknownCodeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CODE_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(code, _)| *code)
            .ok_or_else(|| UnknownCodeName(s.to_string()))
    }
}

/// What a failed call means to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The signature simply does not verify. Not an error.
    BadSignature,
    /// The key, signature or message had the wrong shape or encoding.
    InvalidInput,
    /// Anything else the context reported.
    LibraryFault,
}

impl ErrorClass {
    /// The one place raw codes are mapped to outcomes.
    pub fn classify(code: RawErrorCode) -> Self {
        match code {
            RawErrorCode::BadMessageMac => ErrorClass::BadSignature,
            RawErrorCode::InvalidBase64
            | RawErrorCode::InputBufferTooSmall
            | RawErrorCode::BadMessageFormat
            | RawErrorCode::BadMessageKeyId => ErrorClass::InvalidInput,
            _ => ErrorClass::LibraryFault,
        }
    }
}

/// Hard failures surfaced by [`crate::Utility`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("Invalid input ({code}): {detail}")]
    InvalidInput { code: RawErrorCode, detail: String },

    #[error("Utility context fault ({code}): {detail}")]
    LibraryFault { code: RawErrorCode, detail: String },
}

impl CryptoError {
    /// Build the error for a failed call. Returns `None` for a
    /// `BadSignature` classification, which callers report as `false`.
    pub fn from_code(code: RawErrorCode, detail: impl Into<String>) -> Option<Self> {
        match ErrorClass::classify(code) {
            ErrorClass::BadSignature => None,
            ErrorClass::InvalidInput => Some(CryptoError::InvalidInput {
                code,
                detail: detail.into(),
            }),
            ErrorClass::LibraryFault => Some(CryptoError::LibraryFault {
                code,
                detail: detail.into(),
            }),
        }
    }

    pub fn code(&self) -> RawErrorCode {
        match self {
            CryptoError::InvalidInput { code, .. } | CryptoError::LibraryFault { code, .. } => {
                *code
            }
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            CryptoError::InvalidInput { .. } => ErrorClass::InvalidInput,
            CryptoError::LibraryFault { .. } => ErrorClass::LibraryFault,
        }
    }
}
