//! Site listings

use energycoop_auth::Principal;
use energycoop_common::Site;

#[derive(Debug, Default, Clone, Copy)]
pub struct InfoService;

impl InfoService {
    pub fn get_sites(&self) -> Vec<Site> {
        Site::ALL.to_vec()
    }

    /// Sites the principal owns a non-zero share of
    pub fn get_sites_with_user_ownership(&self, principal: &Principal) -> Vec<Site> {
        principal.sites_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    #[test]
    fn test_sites() {
        assert_eq!(
            InfoService.get_sites(),
            vec![Site::GraigFatha, Site::KirkHill, Site::DerrilWater]
        );

        let principal = Principal {
            user_id: "member".to_string(),
            authorities: BTreeSet::new(),
            ownerships: BTreeMap::from([(Site::KirkHill, 10.0)]),
        };
        assert_eq!(
            InfoService.get_sites_with_user_ownership(&principal),
            vec![Site::KirkHill]
        );
        assert!(
            InfoService
                .get_sites_with_user_ownership(&Principal::anonymous())
                .is_empty()
        );
    }
}
