// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

use hta_adapter_bootstrap::cli::Cli;
use hta_adapter_bootstrap::config::BootstrapConfig;
use hta_adapter_bootstrap::exit_code::ExitCode;
use hta_adapter_bootstrap::shutdown::ShutdownCoordinator;
use hta_adapter_bootstrap::signals::create_signal_handler;
use hta_adapter_bootstrap::{app_runner, composition_root, logger};

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code.as_i32());
}

async fn run() -> ExitCode {
    let cli = match Cli::parse_and_validate() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            return e.exit_code();
        }
    };

    let mut builder = BootstrapConfig::builder()
        .service_config_path(cli.config)
        .verbose(cli.verbose);
    if let Some(path) = cli.observability_config {
        builder = builder.observability_config_path(path);
    }
    let bootstrap_config = match builder.try_build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::Config;
        }
    };

    let observability = match composition_root::load_observability(&bootstrap_config).await {
        Ok(observability) => observability,
        Err(e) => {
            eprintln!("failed to load observability config: {e}");
            return ExitCode::from_error(&e);
        }
    };

    if let Err(e) = logger::init(&observability, bootstrap_config.log_level()) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::Software;
    }

    tracing::info!("hta-adapter starting up");

    let mut shutdown = ShutdownCoordinator::new();
    let application = match composition_root::build(&bootstrap_config, &mut shutdown).await {
        Ok(application) => application,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            return ExitCode::from_error(&e);
        }
    };
    app_runner::run(application, create_signal_handler(), shutdown).await
}
