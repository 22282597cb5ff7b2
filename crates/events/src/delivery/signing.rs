//! HMAC-SHA256 payload signing.
//!
//! The signature is computed per subscriber over the shared canonical body,
//! keyed by that subscription's secret, so each endpoint can verify
//! authenticity and integrity without trusting the transport.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign a payload body, returning the lowercase hex digest carried in the
/// `X-Signature` header.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a received hex signature against a body and secret.
///
/// Comparison is constant-time via the `hmac` crate.
pub fn verify(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector_matches() {
        // RFC 2202-style published test vector for HMAC-SHA256.
        let signature = sign("key", b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            signature,
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn deterministic_for_fixed_body_and_secret() {
        let body = br#"{"event":"appointment.created"}"#;
        assert_eq!(sign("secret-a", body), sign("secret-a", body));
    }

    #[test]
    fn changes_when_secret_changes() {
        let body = br#"{"event":"appointment.created"}"#;
        assert_ne!(sign("secret-a", body), sign("secret-b", body));
    }

    #[test]
    fn verify_accepts_own_signature_and_rejects_tampering() {
        let body = b"payload";
        let signature = sign("s3cret", body);
        assert!(verify("s3cret", body, &signature));
        assert!(!verify("other", body, &signature));
        assert!(!verify("s3cret", b"tampered", &signature));
        assert!(!verify("s3cret", body, "not-hex"));
    }
}
