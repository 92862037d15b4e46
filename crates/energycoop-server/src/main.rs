use std::sync::Arc;

use energycoop_client::VensysHttpClient;
use energycoop_persistence::ExternalDbPersistService;
use energycoop_server::{
    AppState, Configuration, scheduler,
    startup::{self, run_with_shutdown},
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration and logging
    let configuration = Configuration::new()?;
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    info!(profile = %configuration.profile(), "Starting energy co-op server");

    let db = configuration.database_connection().await?;
    let persistence = ExternalDbPersistService::new(db);
    if configuration.db_auto_migrate() {
        persistence.ensure_schema().await?;
    }

    let vensys = VensysHttpClient::new(configuration.vensys_client_config())?;

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    let scheduling_enabled = configuration.scheduling_enabled();
    let energy_yield_cron = configuration.energy_yield_cron();
    let performance_cron = configuration.performance_cron();

    let app_state = Arc::new(AppState::build(
        configuration,
        Arc::new(persistence),
        Arc::new(vensys),
    )?);

    let shutdown_signal = startup::wait_for_shutdown_signal().await;

    let jobs = if scheduling_enabled {
        let jobs = scheduler::graig_fatha_jobs(
            app_state.stats_service.clone(),
            &energy_yield_cron,
            &performance_cron,
        )?;
        scheduler::start(jobs, &shutdown_signal)
    } else {
        info!("Scheduling disabled");
        Vec::new()
    };

    info!("Starting main server on {}:{}", server_address, server_port);
    let server = startup::main_server(app_state, server_address, server_port)?;
    let handle = server.handle();

    match run_with_shutdown(server, shutdown_signal.subscribe()).await {
        Some(Err(e)) => error!("Main server error: {}", e),
        Some(Ok(())) => {}
        None => {
            info!("Main server shutting down gracefully");
            handle.stop(true).await;
        }
    }

    shutdown_signal.shutdown();
    for job in jobs {
        if let Err(e) = job.await {
            error!("Scheduler task ended abnormally: {}", e);
        }
    }

    info!("Energy co-op server shutdown complete");

    Ok(())
}
