use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// HS256 signer/verifier bound to one secret.
///
/// Verification rules are fixed at construction: `exp` is mandatory, no
/// clock leeway, and `iss` must match when an issuer is set.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// The secret should be at least 32 bytes.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_required_spec_claims(&["exp", "iss"]);
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify the signature, then the registered claims.
    ///
    /// A forged token reports `InvalidToken` even when its `exp` has passed;
    /// only a correctly signed token can be `TokenExpired`.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde::Deserialize;

    use super::*;

    const SECRET: &[u8] = b"clinic_session_secret_32_bytes_min";
    const OTHER_SECRET: &[u8] = b"another_session_secret_32_bytes_mn";

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Claims {
        sub: String,
        role: String,
        exp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        iss: Option<String>,
    }

    fn claims(expires_in_seconds: i64, iss: Option<&str>) -> Claims {
        Claims {
            sub: "5c1f0e0a-8d8e-4f6e-9a57-3f1d2b7c9e10".to_string(),
            role: "patient".to_string(),
            exp: Utc::now().timestamp() + expires_in_seconds,
            iss: iss.map(str::to_string),
        }
    }

    #[test]
    fn test_signed_claims_come_back_unchanged() {
        let handler = JwtHandler::new(SECRET);
        let original = claims(900, None);

        let token = handler.encode(&original).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(handler.decode::<Claims>(&token).unwrap(), original);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let handler = JwtHandler::new(SECRET);

        let result = handler.decode::<Claims>("not-a-jwt");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_foreign_signature_is_invalid() {
        let token = JwtHandler::new(OTHER_SECRET)
            .encode(&claims(900, None))
            .unwrap();

        let result = JwtHandler::new(SECRET).decode::<Claims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_past_exp_is_expired_without_leeway() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.encode(&claims(-2, None)).unwrap();

        assert_eq!(handler.decode::<Claims>(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_expired_forgery_is_invalid_not_expired() {
        let token = JwtHandler::new(OTHER_SECRET)
            .encode(&claims(-60, None))
            .unwrap();

        let result = JwtHandler::new(SECRET).decode::<Claims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_missing_exp_is_invalid() {
        #[derive(Serialize, Deserialize)]
        struct Unbounded {
            sub: String,
        }

        let handler = JwtHandler::new(SECRET);
        let token = handler
            .encode(&Unbounded {
                sub: "someone".to_string(),
            })
            .unwrap();

        let result = handler.decode::<Unbounded>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_issuer_is_enforced_when_configured() {
        let handler = JwtHandler::new(SECRET).with_issuer("clinic");

        let matching = handler.encode(&claims(900, Some("clinic"))).unwrap();
        let foreign = handler.encode(&claims(900, Some("elsewhere"))).unwrap();
        let absent = handler.encode(&claims(900, None)).unwrap();

        assert!(handler.decode::<Claims>(&matching).is_ok());
        assert!(matches!(
            handler.decode::<Claims>(&foreign),
            Err(JwtError::InvalidToken(_))
        ));
        assert!(matches!(
            handler.decode::<Claims>(&absent),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
