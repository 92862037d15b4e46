pub mod alert;
pub mod info;
pub mod member;
pub mod savings_rate;
pub mod stats;
pub mod tax_document;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use energycoop_client::{VensysClient, VensysMeanDataResponse, VensysPerformanceDataResponse};
    use energycoop_common::EnergyCoopError;
    use energycoop_persistence::sea_orm::Database;
    use energycoop_persistence::{ExternalDbPersistService, PersistenceService};

    /// Canned Vensys responses
    #[derive(Default)]
    pub struct FakeVensysClient {
        pub mean: Option<VensysMeanDataResponse>,
        pub current: Option<VensysPerformanceDataResponse>,
        pub performance: Option<VensysPerformanceDataResponse>,
        pub fail: bool,
        pub windows: Mutex<Vec<(i64, i64)>>,
    }

    impl FakeVensysClient {
        pub fn performance_windows(&self) -> Vec<(i64, i64)> {
            self.windows.lock().unwrap().clone()
        }

        fn check(&self) -> anyhow::Result<()> {
            if self.fail {
                return Err(EnergyCoopError::NetworkError("vensys unreachable".to_string()).into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl VensysClient for FakeVensysClient {
        async fn get_mean_energy_yield(&self) -> anyhow::Result<Option<VensysMeanDataResponse>> {
            self.check()?;
            Ok(self.mean.clone())
        }

        async fn get_current_performance(
            &self,
        ) -> anyhow::Result<Option<VensysPerformanceDataResponse>> {
            self.check()?;
            Ok(self.current.clone())
        }

        async fn get_performance(
            &self,
            from: i64,
            to: i64,
        ) -> anyhow::Result<Option<VensysPerformanceDataResponse>> {
            self.check()?;
            self.windows.lock().unwrap().push((from, to));
            Ok(self.performance.clone())
        }
    }

    pub async fn sqlite_persistence() -> Arc<dyn PersistenceService> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let service = ExternalDbPersistService::new(db);
        service.ensure_schema().await.unwrap();
        Arc::new(service)
    }
}
