//! The utility context: an opaque block of scratch state plus a last-error
//! slot, with the call surface of the Olm `OlmUtility` object.
//!
//! A failed call records a [`RawErrorCode`] in the last-error slot and
//! returns [`Failed`]; callers read the reason back with
//! [`UtilityContext::last_error`].
//! The context is only ever reached through [`crate::Utility`], which owns
//! exactly one boxed context and clears it before it is freed.

use std::mem;

use base64::alphabet;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use ed25519_dalek::{Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::RawErrorCode;

pub const SHA256_DIGEST_LENGTH: usize = 32;
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// Unpadded standard base64, lenient about unused trailing bits.
const UNPADDED_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Signatures are decoded strictly: unused trailing bits must be zero, so
/// each 64-byte signature has exactly one accepted text form.
const SIGNATURE_B64: GeneralPurpose = STANDARD_NO_PAD;

/// A context call failed; the reason is in the last-error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failed;

/// Length of the unpadded base64 text for `raw` bytes.
pub const fn encoded_length(raw: usize) -> usize {
    (raw * 4 + 2) / 3
}

/// Number of bytes an unpadded base64 text of `encoded` chars decodes to.
/// A remainder of one char can never be produced by an encoder.
pub const fn decoded_length(encoded: usize) -> Option<usize> {
    match encoded % 4 {
        1 => None,
        0 => Some(encoded / 4 * 3),
        rem => Some(encoded / 4 * 3 + rem - 1),
    }
}

pub struct UtilityContext {
    last_error: RawErrorCode,
    scratch: [u8; ED25519_SIGNATURE_LENGTH],
    cleared: bool,
}

impl UtilityContext {
    /// Bytes needed to hold one context.
    pub fn size() -> usize {
        mem::size_of::<Self>()
    }

    /// Allocate and initialise a context on the heap.
    pub fn allocate() -> Box<Self> {
        tracing::trace!(bytes = Self::size(), "allocating utility context");
        Box::new(Self {
            last_error: RawErrorCode::Success,
            scratch: [0u8; ED25519_SIGNATURE_LENGTH],
            cleared: false,
        })
    }

    /// Code recorded by the most recent failed call.
    pub fn last_error(&self) -> RawErrorCode {
        self.last_error
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Output length `sha256` needs, in bytes of base64 text.
    pub fn sha256_length(&self) -> usize {
        encoded_length(SHA256_DIGEST_LENGTH)
    }

    /// Write the base64 SHA-256 digest of `input` into `output` and return
    /// the number of bytes written.
    pub fn sha256(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Failed> {
        debug_assert!(!self.cleared, "utility context used after teardown");
        let needed = self.sha256_length();
        if output.len() < needed {
            return Err(self.fail(RawErrorCode::OutputBufferTooSmall));
        }
        let digest = Sha256::digest(input);
        self.scratch[..SHA256_DIGEST_LENGTH].copy_from_slice(&digest);
        let written = UNPADDED_B64
            .encode_slice(&self.scratch[..SHA256_DIGEST_LENGTH], &mut output[..needed])
            .map_err(|_| self.fail(RawErrorCode::OutputBufferTooSmall))?;
        self.scratch.zeroize();
        Ok(written)
    }

    /// Verify a base64 Ed25519 `signature` over `message` with a base64
    /// public `key`. The signature buffer is decoded in place, so its
    /// contents are not preserved.
    pub fn ed25519_verify(
        &mut self,
        key: &[u8],
        message: &[u8],
        signature: &mut [u8],
    ) -> Result<(), Failed> {
        debug_assert!(!self.cleared, "utility context used after teardown");
        if decoded_length(key.len()) != Some(ED25519_PUBLIC_KEY_LENGTH) {
            return Err(self.fail(RawErrorCode::InvalidBase64));
        }
        if decoded_length(signature.len()) != Some(ED25519_SIGNATURE_LENGTH) {
            return Err(self.fail(RawErrorCode::InvalidBase64));
        }

        let key_bytes: [u8; ED25519_PUBLIC_KEY_LENGTH] = match UNPADDED_B64
            .decode(key)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
        {
            Some(bytes) => bytes,
            None => return Err(self.fail(RawErrorCode::InvalidBase64)),
        };

        // The length is right, so text that does not decode cannot be the
        // encoding of any signature: it fails the check like a forgery.
        let raw_signature = match SIGNATURE_B64.decode(&*signature) {
            Ok(bytes) if bytes.len() == ED25519_SIGNATURE_LENGTH => bytes,
            _ => return Err(self.fail(RawErrorCode::BadMessageMac)),
        };
        signature[..ED25519_SIGNATURE_LENGTH].copy_from_slice(&raw_signature);
        self.scratch.copy_from_slice(&raw_signature);

        let outcome = match VerifyingKey::from_bytes(&key_bytes) {
            Ok(verifying_key) => verifying_key
                .verify_strict(message, &Signature::from_bytes(&self.scratch))
                .map_err(|_| RawErrorCode::BadMessageMac),
            // Not a point on the curve: nothing could have signed for it.
            Err(_) => Err(RawErrorCode::BadMessageMac),
        };
        self.scratch.zeroize();
        outcome.map_err(|code| self.fail(code))
    }

    /// Wipe all scratch state. The context must not be used afterwards.
    pub fn clear(&mut self) {
        self.scratch.zeroize();
        self.last_error = RawErrorCode::Success;
        self.cleared = true;
        tracing::trace!("utility context cleared");
    }

    fn fail(&mut self, code: RawErrorCode) -> Failed {
        self.last_error = code;
        Failed
    }
}
