//! mx_crypto — content hashing and signature verification for the Matrix
//! client's trust checks.
//!
//! # Module layout
//! - `context` — the opaque utility context (sizing, SHA-256, Ed25519, last error)
//! - `utility` — `Utility`, the owning wrapper callers use
//! - `error`   — raw error codes, their classification, `CryptoError`
//!
//! Keys, signatures and digests use unpadded standard base64, as in Matrix
//! device keys.

mod context;
pub mod error;
pub mod utility;

pub use context::{ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH, SHA256_DIGEST_LENGTH};
pub use error::{CryptoError, ErrorClass, RawErrorCode};
pub use utility::Utility;
