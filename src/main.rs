use restaurant_provisioner::{
    exit_status,
    provisioner::EXIT_FATAL,
    schema,
    utils::{config, database},
    Provisioner,
};
use std::process::ExitCode;
use tracing_subscriber::{prelude::*, EnvFilter};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let config = match config::get_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{}", err);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let mut session = match database::connect(&config.database).await {
        Ok(session) => session,
        Err(err) => {
            tracing::error!("{}", err);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let result = Provisioner::new(&mut session, &config.database_name)
        .run(&schema::TABLES)
        .await;

    if let Err(err) = session.close().await {
        tracing::warn!("Failed to close database connection: {}", err);
    }

    match &result {
        Ok(report) if report.is_complete() => {
            tracing::info!("All tables created successfully.")
        }
        Ok(report) => tracing::error!(
            "Provisioning of '{}' incomplete, failed tables: {}",
            report.database,
            report.failed_tables().join(", ")
        ),
        Err(_) => (),
    }

    ExitCode::from(exit_status(&result))
}
