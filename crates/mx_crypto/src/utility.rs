//! Content hashing and Ed25519 signature checks for the trust layer.

use tracing::{debug, warn};

use crate::context::UtilityContext;
use crate::error::{CryptoError, RawErrorCode};

/// Owns one utility context for its whole lifetime.
///
/// Every call takes `&mut self`: the context keeps scratch state between the
/// steps of a call, so one `Utility` serves one caller at a time. Callers
/// verifying in parallel should create one `Utility` each.
pub struct Utility {
    ctx: Box<UtilityContext>,
}

impl Utility {
    pub fn new() -> Self {
        Self {
            ctx: UtilityContext::allocate(),
        }
    }

    /// Base64 SHA-256 digest of arbitrary bytes.
    pub fn sha256_bytes(&mut self, input: &[u8]) -> Result<String, CryptoError> {
        let mut output = vec![0u8; self.ctx.sha256_length()];
        let written = self
            .ctx
            .sha256(input, &mut output)
            .map_err(|_| hard_fault(self.ctx.last_error(), "sha256 digest"))?;
        output.truncate(written);
        // Byte-for-byte into chars; the digest text is plain ASCII.
        Ok(output.into_iter().map(char::from).collect())
    }

    /// Digest of the UTF-8 encoding of `message`.
    pub fn sha256_utf8_msg(&mut self, message: &str) -> Result<String, CryptoError> {
        self.sha256_bytes(message.as_bytes())
    }

    /// Check a base64 Ed25519 `signature` over `message` against a base64
    /// public `key`.
    ///
    /// `Ok(false)` means the signature does not match, including signature
    /// text of the right length that is not a valid encoding. Keys or
    /// signatures of the wrong length, and any other context failure, come
    /// back as `Err` and must not be read as "unsigned".
    pub fn ed25519_verify(
        &mut self,
        key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        // The context decodes the signature in place.
        let mut signature_buf = signature.to_vec();
        if self.ctx.ed25519_verify(key, message, &mut signature_buf).is_ok() {
            return Ok(true);
        }
        let code = self.ctx.last_error();
        match CryptoError::from_code(code, "ed25519 verification") {
            None => {
                debug!(message_len = message.len(), "ed25519 signature did not verify");
                Ok(false)
            }
            Some(err) => {
                warn!(code = %code, class = ?err.class(), "ed25519 verification failed");
                Err(err)
            }
        }
    }
}

impl Default for Utility {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Utility {
    fn drop(&mut self) {
        if !self.ctx.is_cleared() {
            self.ctx.clear();
        }
    }
}

/// Calls other than verification have no domain-negative outcome.
fn hard_fault(code: RawErrorCode, detail: &str) -> CryptoError {
    CryptoError::from_code(code, detail).unwrap_or_else(|| CryptoError::LibraryFault {
        code,
        detail: detail.to_string(),
    })
}
