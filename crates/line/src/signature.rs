//! Webhook signature verification.
//!
//! LINE signs each webhook delivery with HMAC-SHA256 over the raw request
//! body, keyed on the channel secret, and sends the base64 digest in the
//! `x-line-signature` header. Verification must run on the exact bytes
//! received, before any JSON parsing.

use crate::LineError;
use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Checks a webhook delivery's signature header against the body bytes.
///
/// Returns `Ok(false)` for a missing, malformed or mismatching signature;
/// `Err` only when the channel secret itself is unusable.
pub fn verify_signature(
    channel_secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<bool, LineError> {
    let Some(signature) = signature else {
        return Ok(false);
    };

    let Ok(expected) = STANDARD.decode(signature) else {
        return Ok(false);
    };

    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| LineError::InvalidChannelSecret)?;
    mac.update(body);

    Ok(mac.verify_slice(&expected).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-channel-secret";

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_verifies() {
        let body = br#"{"events":[]}"#;
        let signature = sign(SECRET, body);
        assert!(verify_signature(SECRET, body, Some(&signature)).unwrap());
    }

    #[test]
    fn missing_signature_is_rejected() {
        assert!(!verify_signature(SECRET, b"{}", None).unwrap());
    }

    #[test]
    fn signature_for_different_body_is_rejected() {
        let signature = sign(SECRET, b"original body");
        assert!(!verify_signature(SECRET, b"tampered body", Some(&signature)).unwrap());
    }

    #[test]
    fn signature_with_wrong_secret_is_rejected() {
        let body = br#"{"events":[]}"#;
        let signature = sign("other-secret", body);
        assert!(!verify_signature(SECRET, body, Some(&signature)).unwrap());
    }

    #[test]
    fn non_base64_signature_is_rejected_not_an_error() {
        assert!(!verify_signature(SECRET, b"{}", Some("!!not-base64!!")).unwrap());
    }
}
