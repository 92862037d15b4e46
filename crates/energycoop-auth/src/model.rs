//! Authentication and authorization models
//!
//! Claims as they arrive in the bearer token, the principal derived from them,
//! and the authority names the HTTP API is guarded by.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use energycoop_common::Site;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::service::auth::VerifyError;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TOKEN_PREFIX: &str = "Bearer ";
pub const DEFAULT_OWNERSHIPS_CLAIM: &str = "https://energycoop.emcreations.co.uk/ownerships";
pub const ANONYMOUS_USER: &str = "anonymous";

/// Authority names carried in the `permissions` or `scope` claims
pub mod authority {
    pub const READ_GF_API: &str = "read:gf-api";
    pub const READ_GF_STATS: &str = "read:gf-stats";
    pub const READ_GF_STATS_ADVANCED: &str = "read:gf-stats-advanced";
    pub const READ_TAX_DOCUMENT: &str = "read:tax-document";
    pub const SET_SAVINGS_RATE: &str = "set:savings-rate";
    pub const READ_ALERTS: &str = "read:alerts";

    pub const ALL: [&str; 6] = [
        READ_GF_API,
        READ_GF_STATS,
        READ_GF_STATS_ADVANCED,
        READ_TAX_DOCUMENT,
        SET_SAVINGS_RATE,
        READ_ALERTS,
    ];
}

/// JWT payload accepted from the identity provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// A single audience or a list of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    /// Space delimited authorities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Every other claim, including the ownerships claim
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Union of `permissions` and `scope`
    pub fn authorities(&self) -> BTreeSet<String> {
        let mut authorities: BTreeSet<String> = self.permissions.iter().cloned().collect();
        if let Some(scope) = &self.scope {
            authorities.extend(scope.split_whitespace().map(str::to_string));
        }
        authorities
    }

    /// Ownerships in watts keyed by site, read from the claim named `claim`.
    ///
    /// Values may be numbers or numeric strings; unknown sites and unparsable
    /// values are skipped.
    pub fn ownerships(&self, claim: &str) -> BTreeMap<Site, f64> {
        let mut ownerships = BTreeMap::new();

        let Some(serde_json::Value::Object(map)) = self.extra.get(claim) else {
            return ownerships;
        };

        for (name, value) in map {
            let Ok(site) = name.parse::<Site>() else {
                debug!("Ignoring ownership of unknown site {}", name);
                continue;
            };
            let watts = match value {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match watts {
                Some(w) if w.is_finite() => {
                    ownerships.insert(site, w);
                }
                _ => debug!("Ignoring malformed ownership value for {}", name),
            }
        }

        ownerships
    }
}

/// The authenticated caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Principal {
    pub user_id: String,
    pub authorities: BTreeSet<String>,
    pub ownerships: BTreeMap<Site, f64>,
}

impl Principal {
    pub fn from_claims(claims: &Claims, ownerships_claim: &str) -> Self {
        Self {
            user_id: claims.sub.clone(),
            authorities: claims.authorities(),
            ownerships: claims.ownerships(ownerships_claim),
        }
    }

    /// Holder of every known authority and no ownerships, used when
    /// security is switched off
    pub fn anonymous() -> Self {
        Self {
            user_id: ANONYMOUS_USER.to_string(),
            authorities: authority::ALL.iter().map(|a| a.to_string()).collect(),
            ownerships: BTreeMap::new(),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn ownership(&self, site: Site) -> Option<f64> {
        self.ownerships.get(&site).copied()
    }

    /// Sites with a positive ownership, in `Site` order
    pub fn sites_owned(&self) -> Vec<Site> {
        Site::ALL
            .into_iter()
            .filter(|site| self.ownership(*site).is_some_and(|w| w > 0.0))
            .collect()
    }
}

/// Auth context passed through request extensions
#[derive(Debug, Default, Clone)]
pub struct AuthContext {
    pub principal: Option<Principal>,
    pub jwt_error: Option<VerifyError>,
    pub token_provided: bool,
}

impl AuthContext {
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            jwt_error: None,
            token_provided: true,
        }
    }

    pub fn jwt_error_string(&self) -> String {
        match &self.jwt_error {
            Some(VerifyError::Expired) => "token expired!".to_string(),
            Some(e) => e.to_string(),
            None => String::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(json: serde_json::Value) -> Claims {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_authorities_from_permissions_and_scope() {
        let c = claims(serde_json::json!({
            "sub": "auth0|member",
            "exp": 4_000_000_000i64,
            "permissions": ["read:gf-api"],
            "scope": "openid read:gf-stats  read:alerts"
        }));

        let authorities = c.authorities();
        assert!(authorities.contains("read:gf-api"));
        assert!(authorities.contains("read:gf-stats"));
        assert!(authorities.contains("read:alerts"));
        assert!(authorities.contains("openid"));
        assert!(!authorities.contains("set:savings-rate"));
    }

    #[test]
    fn test_ownerships_parsing() {
        let c = claims(serde_json::json!({
            "sub": "member",
            "exp": 4_000_000_000i64,
            DEFAULT_OWNERSHIPS_CLAIM: {
                "GRAIG_FATHA": 1500,
                "KIRK_HILL": "250.5",
                "ATLANTIS": 10,
                "DERRIL_WATER": "lots"
            }
        }));

        let ownerships = c.ownerships(DEFAULT_OWNERSHIPS_CLAIM);
        assert_eq!(ownerships.get(&Site::GraigFatha), Some(&1500.0));
        assert_eq!(ownerships.get(&Site::KirkHill), Some(&250.5));
        assert_eq!(ownerships.len(), 2);
        assert!(c.ownerships("other-claim").is_empty());
    }

    #[test]
    fn test_sites_owned_skips_zero() {
        let principal = Principal {
            user_id: "member".to_string(),
            authorities: BTreeSet::new(),
            ownerships: BTreeMap::from([
                (Site::DerrilWater, 100.0),
                (Site::KirkHill, 0.0),
                (Site::GraigFatha, 5.0),
            ]),
        };

        assert_eq!(principal.sites_owned(), vec![Site::GraigFatha, Site::DerrilWater]);
        assert_eq!(principal.ownership(Site::KirkHill), Some(0.0));
    }

    #[test]
    fn test_anonymous_has_every_authority() {
        let principal = Principal::anonymous();
        for a in authority::ALL {
            assert!(principal.has_authority(a));
        }
        assert!(principal.sites_owned().is_empty());
    }

    #[test]
    fn test_jwt_error_string() {
        let mut ctx = AuthContext::default();
        assert_eq!(ctx.jwt_error_string(), "");

        ctx.jwt_error = Some(VerifyError::Expired);
        assert_eq!(ctx.jwt_error_string(), "token expired!");
    }
}
