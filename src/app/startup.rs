//! Application startup for the sharedq binary

use crate::app::cli::args::Args;
use crate::app::cli::display::display_report;
use crate::app::soak::run_soak;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version::long_version;
use clap::Parser;

/// Parse arguments, set up logging and configuration, then run the soak driver
pub fn startup() {
    let args = Args::parse();
    let use_color = args.use_color();
    colored::control::set_override(use_color);

    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        args.log_file_path(),
        use_color,
    ) {
        eprintln!("Error initializing logging: {}", e);
        std::process::exit(1);
    }

    log::info!("sharedq {} starting", long_version());

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Configuration loading");
            std::process::exit(1);
        }
    };
    log::debug!("Effective configuration: {:?}", config);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("FATAL: Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(ShutdownCoordinator::guard(
        |coordinator, _shutdown_rx| async move {
            run_soak(&config.queue_set, &config.soak, &coordinator).await
        },
    ));

    match result {
        Ok(report) => display_report(&report, use_color),
        Err(e) => {
            log_error_with_context(&e, "Soak run");
            std::process::exit(1);
        }
    }
}
