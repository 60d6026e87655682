use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;
use crate::jwt::REFRESH_TOKEN_TYPE;

/// Signing key pair for one actor kind.
///
/// Holds separate handlers for the access and refresh secrets, so a
/// refresh token can never verify as an access token and vice versa.
/// Each actor kind gets its own `TokenSigner`, which is what keeps a
/// leaked employee token from being replayed against the user surface.
pub struct TokenSigner {
    access: JwtHandler,
    refresh: JwtHandler,
}

impl TokenSigner {
    /// Create a signer from an access/refresh secret pair.
    ///
    /// The two secrets must differ; secret-distinctness across actor
    /// kinds is enforced by service configuration validation.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        debug_assert_ne!(
            access_secret, refresh_secret,
            "access and refresh secrets must differ"
        );

        Self {
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
        }
    }

    /// Sign access claims with the access secret.
    pub fn sign_access(&self, claims: &AccessClaims) -> Result<String, JwtError> {
        self.access.encode(claims)
    }

    /// Sign refresh claims with the refresh secret.
    pub fn sign_refresh(&self, claims: &RefreshClaims) -> Result<String, JwtError> {
        self.refresh.encode(claims)
    }

    /// Validate a token against the access secret.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `DecodingFailed` - Signature invalid, wrong secret, or malformed
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.access.decode(token)
    }

    /// Validate a token against the refresh secret.
    ///
    /// Rejects tokens whose `token_type` claim is not `"refresh"`.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `DecodingFailed` - Signature invalid, wrong secret, or malformed
    /// * `WrongTokenType` - Payload is not refresh-scoped
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        let claims: RefreshClaims = self.refresh.decode(token)?;

        if !claims.is_refresh() {
            return Err(JwtError::WrongTokenType {
                expected: REFRESH_TOKEN_TYPE,
            });
        }

        Ok(claims)
    }
}
