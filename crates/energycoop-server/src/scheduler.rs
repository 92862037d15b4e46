//! Cron-driven telemetry jobs
//!
//! Each job runs in its own task, sleeping until the next fire time of its
//! six-field (seconds first) cron expression. A failed run is logged and the
//! job waits for its next fire time.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use cron::Schedule;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::service::stats::GraigFathaStatsService;
use crate::startup::ShutdownSignal;

type JobFn = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// A named job and when it runs
pub struct ScheduledJob {
    name: &'static str,
    expression: String,
    schedule: Schedule,
    run: JobFn,
}

impl ScheduledJob {
    pub fn new<F, Fut>(name: &'static str, expression: &str, run: F) -> anyhow::Result<Self>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let schedule = Schedule::from_str(expression).map_err(|e| {
            anyhow::anyhow!("Invalid cron expression '{}' for {}: {}", expression, name, e)
        })?;

        Ok(Self {
            name,
            expression: expression.to_string(),
            schedule,
            run: Arc::new(move || run().boxed()),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Time until the next fire time, `None` when the schedule has ended
    fn until_next(&self) -> Option<std::time::Duration> {
        let next = self.schedule.upcoming(Utc).next()?;
        Some((next - Utc::now()).to_std().unwrap_or_default())
    }

    async fn run_once(&self) {
        info!(job = self.name, "Running scheduled job");
        if let Err(e) = (self.run)().await {
            error!(job = self.name, "Scheduled job failed: {:#}", e);
        }
    }
}

/// The energy yield and performance logging jobs for Graig Fatha
pub fn graig_fatha_jobs(
    stats: Arc<GraigFathaStatsService>,
    energy_yield_cron: &str,
    performance_cron: &str,
) -> anyhow::Result<Vec<ScheduledJob>> {
    let energy_stats = stats.clone();
    let energy_yield = ScheduledJob::new(
        "graig-fatha-energy-yield",
        energy_yield_cron,
        move || {
            let stats = energy_stats.clone();
            async move { stats.log_energy_yield().await.map(|_| ()) }
        },
    )?;

    let performance = ScheduledJob::new(
        "graig-fatha-performance",
        performance_cron,
        move || {
            let stats = stats.clone();
            async move { stats.log_yesterday_performance().await }
        },
    )?;

    Ok(vec![energy_yield, performance])
}

/// Spawn every job. Each task ends when `shutdown` fires.
pub fn start(jobs: Vec<ScheduledJob>, shutdown: &ShutdownSignal) -> Vec<JoinHandle<()>> {
    jobs.into_iter()
        .map(|job| {
            let mut shutdown_rx = shutdown.subscribe();
            info!(job = job.name, schedule = %job.expression, "Scheduling job");

            tokio::spawn(async move {
                loop {
                    let Some(delay) = job.until_next() else {
                        warn!(job = job.name, "Schedule has no upcoming fire time, stopping");
                        break;
                    };

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => job.run_once().await,
                        _ = shutdown_rx.recv() => {
                            info!(job = job.name, "Scheduler stopping");
                            break;
                        }
                    }
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    fn counting_job(expression: &str, counter: Arc<AtomicUsize>, fail: bool) -> ScheduledJob {
        ScheduledJob::new(
            "test-job",
            expression,
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if fail {
                        anyhow::bail!("job failed");
                    }
                    Ok(())
                }
            },
        )
        .unwrap()
    }

    #[test]
    fn test_default_expressions_parse() {
        let counter = Arc::new(AtomicUsize::new(0));
        for expression in ["15 */15 * * * *", "5 0 */6 * * *"] {
            let job = counting_job(expression, counter.clone(), false);
            let delay = job.until_next().unwrap();
            assert!(delay <= Duration::from_secs(6 * 60 * 60));
        }
    }

    #[test]
    fn test_invalid_expression_is_rejected() {
        let result = ScheduledJob::new("broken", "not a cron", || async { Ok(()) });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failing_job_keeps_running_until_shutdown() {
        let counter = Arc::new(AtomicUsize::new(0));
        let shutdown = ShutdownSignal::new();

        let handles = start(
            vec![counting_job("* * * * * *", counter.clone(), true)],
            &shutdown,
        );

        tokio::time::sleep(Duration::from_millis(2500)).await;
        shutdown.shutdown();
        for handle in handles {
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .unwrap()
                .unwrap();
        }

        assert!(counter.load(Ordering::SeqCst) >= 2);
    }
}
