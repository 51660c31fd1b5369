//! Application startup: arguments → configuration → logging → scan

use crate::app::cli::{Args, ScanConfig};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{adjust_level, init_logging, DEFAULT_LOG_LEVEL};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version::version_line;
use crate::zap::api::{Console, ScanOrchestrator, ScanSummary, ZapClient, ZapError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Run the application and return the process exit code
pub async fn startup() -> i32 {
    let argv: Vec<String> = std::env::args().collect();

    // Stage 1: command line (clap prints help/version/usage errors itself)
    let mut args = match Args::try_parse_styled(&argv, Args::color_hint(&argv)) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    // Stage 2: configuration file fills whatever the command line left unset
    match Args::load_config_file(args.config_file.as_deref()).await {
        Ok(file_args) => args.merge_from(file_args),
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_USAGE;
        }
    }

    // Stage 3: logging
    let use_color = args.use_color();
    let base_level = args.log_level.clone().unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let level = adjust_level(&base_level, args.verbosity());
    let log_file = args.effective_log_file();
    if let Err(e) = init_logging(
        Some(level),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return EXIT_FAILURE;
    }
    log::debug!("{}", version_line());

    // Stage 4: validation
    let config = match args.validate() {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Validating configuration");
            return EXIT_USAGE;
        }
    };
    log::debug!(
        "Scanning {} through {} (report: {})",
        config.settings.target,
        config.zap_url,
        config.settings.report_file.display()
    );

    // Stage 5: the scan itself
    match run_scan(config, use_color).await {
        Ok(summary) => {
            log::info!(
                "Scan {} finished after {} status checks: {} alerts, {} byte report",
                summary.scan_id,
                summary.status_polls,
                summary.alerts.len(),
                summary.report_bytes
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            log_error_with_context(&e, "Scan workflow failed");
            EXIT_FAILURE
        }
    }
}

async fn run_scan(config: ScanConfig, use_color: bool) -> Result<ScanSummary, ZapError> {
    let client = ZapClient::new(config.zap_url, config.api_key, config.request_timeout)?;
    log::debug!("Using ZAP API at {}", client.base_url());
    let orchestrator = ScanOrchestrator::new(&client, config.settings);
    let connect_retry = config.connect_retry;

    ShutdownCoordinator::guard(|mut shutdown_rx| async move {
        orchestrator.check_service(connect_retry).await?;
        let mut console = Console::stdout(use_color);
        orchestrator.run(&mut console, &mut shutdown_rx).await
    })
    .await
}
