//! JWT token verification service

use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind, jwk::JwkSet,
};
use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::model::{Claims, DEFAULT_OWNERSHIPS_CLAIM, Principal};

/// Token verification failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VerifyError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            _ => VerifyError::Invalid(e.to_string()),
        }
    }
}

/// Where verification keys come from. One of `secret`, `public_key_pem` or
/// `jwks_url` must be set; the first one present wins.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// Base64 encoded HS256 secret
    pub secret: Option<String>,
    /// RS256 public key in PEM form
    pub public_key_pem: Option<String>,
    /// JSON Web Key Set endpoint of the identity provider
    pub jwks_url: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Name of the claim holding site ownerships
    pub ownerships_claim: String,
    pub cache_ttl_secs: u64,
    pub jwks_ttl_secs: u64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: None,
            public_key_pem: None,
            jwks_url: None,
            issuer: None,
            audience: None,
            ownerships_claim: DEFAULT_OWNERSHIPS_CLAIM.to_string(),
            cache_ttl_secs: 300,
            jwks_ttl_secs: 3600,
        }
    }
}

/// Asymmetric algorithms accepted from a JWKS. A token naming any other
/// algorithm is rejected before a key is looked up.
const JWKS_ALGORITHMS: [Algorithm; 2] = [Algorithm::RS256, Algorithm::ES256];

enum KeySource {
    Static {
        key: Box<DecodingKey>,
        algorithm: Algorithm,
    },
    Jwks {
        url: String,
    },
}

/// Verifies bearer tokens and turns them into principals.
///
/// Successful decodes are cached per token until their `exp` passes or the
/// cache TTL elapses, whichever comes first.
pub struct TokenVerifier {
    source: KeySource,
    settings: JwtSettings,
    http_client: reqwest::Client,
    token_cache: Cache<String, Claims>,
    jwks_cache: Cache<String, JwkSet>,
}

impl TokenVerifier {
    pub fn new(settings: JwtSettings) -> anyhow::Result<Self> {
        let source = if let Some(secret) = settings.secret.as_deref().filter(|s| !s.is_empty()) {
            KeySource::Static {
                key: Box::new(DecodingKey::from_base64_secret(secret)?),
                algorithm: Algorithm::HS256,
            }
        } else if let Some(pem) = settings.public_key_pem.as_deref().filter(|s| !s.is_empty()) {
            KeySource::Static {
                key: Box::new(DecodingKey::from_rsa_pem(pem.as_bytes())?),
                algorithm: Algorithm::RS256,
            }
        } else if let Some(url) = settings.jwks_url.as_deref().filter(|s| !s.is_empty()) {
            info!("Verifying tokens against JWKS at {}", url);
            KeySource::Jwks {
                url: url.to_string(),
            }
        } else {
            anyhow::bail!("no token verification key configured");
        };

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            source,
            http_client,
            token_cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
                .build(),
            jwks_cache: Cache::builder()
                .max_capacity(16)
                .time_to_live(Duration::from_secs(settings.jwks_ttl_secs))
                .build(),
            settings,
        })
    }

    pub fn ownerships_claim(&self) -> &str {
        &self.settings.ownerships_claim
    }

    /// Verify `token` and build the principal it describes
    pub async fn authenticate(&self, token: &str) -> Result<Principal, VerifyError> {
        let claims = self.verify(token).await?;
        Ok(Principal::from_claims(&claims, &self.settings.ownerships_claim))
    }

    /// Decode and validate `token`, consulting the cache first
    pub async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        if let Some(cached) = self.token_cache.get(token).await {
            if cached.exp > chrono::Utc::now().timestamp() {
                return Ok(cached);
            }
            self.token_cache.invalidate(token).await;
        }

        let claims = match &self.source {
            KeySource::Static { key, algorithm } => {
                decode::<Claims>(token, key, &self.validation(*algorithm))?.claims
            }
            KeySource::Jwks { url } => self.verify_with_jwks(url, token).await?,
        };

        self.token_cache
            .insert(token.to_string(), claims.clone())
            .await;

        Ok(claims)
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        match &self.settings.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &self.settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }

    async fn verify_with_jwks(&self, url: &str, token: &str) -> Result<Claims, VerifyError> {
        let header = decode_header(token)?;
        if !JWKS_ALGORITHMS.contains(&header.alg) {
            return Err(VerifyError::Invalid(format!(
                "algorithm {:?} is not accepted for JWKS keys",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| VerifyError::Invalid("token header has no kid".to_string()))?;

        let mut jwks = self.fetch_jwks(url, false).await?;
        if jwks.find(&kid).is_none() {
            // Keys may have rotated since the set was cached
            jwks = self.fetch_jwks(url, true).await?;
        }

        let jwk = jwks
            .find(&kid)
            .ok_or_else(|| VerifyError::KeyUnavailable(format!("no key with kid {}", kid)))?;
        let key = DecodingKey::from_jwk(jwk)?;

        Ok(decode::<Claims>(token, &key, &self.validation(header.alg))?.claims)
    }

    async fn fetch_jwks(&self, url: &str, refresh: bool) -> Result<JwkSet, VerifyError> {
        if !refresh {
            if let Some(jwks) = self.jwks_cache.get(url).await {
                return Ok(jwks);
            }
        }

        debug!("Fetching JWKS from {}", url);
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| VerifyError::KeyUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            warn!("JWKS fetch from {} failed with {}", url, response.status());
            return Err(VerifyError::KeyUnavailable(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| VerifyError::KeyUnavailable(e.to_string()))?;

        self.jwks_cache.insert(url.to_string(), jwks.clone()).await;

        Ok(jwks)
    }

    /// Drop every cached decode
    pub fn clear_token_cache(&self) {
        self.token_cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_a_key() {
        assert!(TokenVerifier::new(JwtSettings::default()).is_err());

        let settings = JwtSettings {
            secret: Some(String::new()),
            ..Default::default()
        };
        assert!(TokenVerifier::new(settings).is_err());
    }

    #[test]
    fn test_expired_signature_maps_to_expired() {
        let err = jsonwebtoken::errors::Error::from(ErrorKind::ExpiredSignature);
        assert_eq!(VerifyError::from(err), VerifyError::Expired);

        let err = jsonwebtoken::errors::Error::from(ErrorKind::InvalidSignature);
        assert!(matches!(VerifyError::from(err), VerifyError::Invalid(_)));
    }
}
