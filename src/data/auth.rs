use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::SigningKey;
use rsa::sha2::Sha256;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use thiserror::Error;

/// The only failure that crosses the data-layer boundary as an error:
/// everything else fails soft to empty values.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("KALSHI_API_KEY_ID is not set")]
    MissingApiKeyId,
    #[error("Kalshi private key is not configured")]
    MissingPrivateKey,
}

/// Header values attached to every authenticated request.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub access_key: String,
    pub timestamp: String,
    pub signature: String,
}

/// Signs outbound requests with RSASSA-PSS over SHA-256.
///
/// Construction succeeds with absent credentials; the error is deferred to
/// the first signing attempt. A present-but-unparseable PEM is a config
/// mistake and fails construction instead.
pub struct RequestSigner {
    api_key_id: Option<String>,
    private_key: Option<RsaPrivateKey>,
}

impl RequestSigner {
    pub fn new(api_key_id: Option<String>, private_key_pem: Option<String>) -> Result<Self> {
        let private_key = match private_key_pem {
            Some(pem) => Some(parse_private_key(pem.trim())?),
            None => None,
        };

        Ok(Self {
            api_key_id,
            private_key,
        })
    }

    /// Sign one request. `path` is the path as the exchange expects it
    /// signed: including the API prefix, excluding the query string.
    ///
    /// PSS signing is randomized, so two calls with identical inputs yield
    /// different (both valid) signatures.
    pub fn headers(
        &self,
        timestamp_ms: u64,
        method: &str,
        path: &str,
    ) -> Result<SignedHeaders, AuthError> {
        let api_key_id = self.api_key_id.as_ref().ok_or(AuthError::MissingApiKeyId)?;
        let private_key = self
            .private_key
            .as_ref()
            .ok_or(AuthError::MissingPrivateKey)?;

        let timestamp = timestamp_ms.to_string();
        let message = format!("{}{}{}", timestamp, method, path);

        let signing_key = SigningKey::<Sha256>::new(private_key.clone());
        let signature = signing_key.sign_with_rng(&mut rand::thread_rng(), message.as_bytes());

        Ok(SignedHeaders {
            access_key: api_key_id.clone(),
            timestamp,
            signature: BASE64.encode(signature.to_bytes()),
        })
    }
}

/// Kalshi hands out PKCS#1 PEMs ("BEGIN RSA PRIVATE KEY"); tooling often
/// re-wraps them as PKCS#8. Accept both.
fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .context("Failed to parse Kalshi private key PEM")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use rsa::pss::{Signature, VerifyingKey};
    use rsa::signature::Verifier;

    fn test_key() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap()
    }

    #[test]
    fn test_signature_verifies_against_public_key() {
        let key = test_key();
        let signer = RequestSigner {
            api_key_id: Some("test-key-id".to_string()),
            private_key: Some(key.clone()),
        };

        let headers = signer
            .headers(1700000000123, "GET", "/trade-api/v2/markets")
            .unwrap();
        assert_eq!(headers.access_key, "test-key-id");
        assert_eq!(headers.timestamp, "1700000000123");

        let message = "1700000000123GET/trade-api/v2/markets";
        let signature_bytes = BASE64.decode(&headers.signature).unwrap();
        let signature = Signature::try_from(signature_bytes.as_slice()).unwrap();

        let verifying_key = VerifyingKey::<Sha256>::new(key.to_public_key());
        assert!(verifying_key
            .verify(message.as_bytes(), &signature)
            .is_ok());
    }

    #[test]
    fn test_repeat_signatures_differ() {
        // PSS padding is randomized: same input, different bytes
        let signer = RequestSigner {
            api_key_id: Some("test-key-id".to_string()),
            private_key: Some(test_key()),
        };

        let first = signer.headers(1700000000123, "GET", "/trade-api/v2/markets");
        let second = signer.headers(1700000000123, "GET", "/trade-api/v2/markets");
        assert_ne!(first.unwrap().signature, second.unwrap().signature);
    }

    #[test]
    fn test_missing_key_id_fails_at_signing_time() {
        let signer = RequestSigner {
            api_key_id: None,
            private_key: Some(test_key()),
        };

        let err = signer.headers(1, "GET", "/trade-api/v2/markets").unwrap_err();
        assert!(matches!(err, AuthError::MissingApiKeyId));
    }

    #[test]
    fn test_missing_private_key_fails_at_signing_time() {
        let signer = RequestSigner {
            api_key_id: Some("test-key-id".to_string()),
            private_key: None,
        };

        let err = signer.headers(1, "GET", "/trade-api/v2/markets").unwrap_err();
        assert!(matches!(err, AuthError::MissingPrivateKey));
    }

    #[test]
    fn test_construction_succeeds_without_credentials() {
        assert!(RequestSigner::new(None, None).is_ok());
    }

    #[test]
    fn test_pkcs8_pem_round_trips() {
        let key = test_key();
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string();

        let signer = RequestSigner::new(Some("test-key-id".to_string()), Some(pem)).unwrap();
        assert!(signer.headers(1, "GET", "/trade-api/v2/markets").is_ok());
    }

    #[test]
    fn test_garbage_pem_fails_construction() {
        let result = RequestSigner::new(
            Some("test-key-id".to_string()),
            Some("not a pem".to_string()),
        );
        assert!(result.is_err());
    }
}
