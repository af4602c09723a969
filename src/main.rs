use flood::config::Config;
use flood::errors::Result;
use flood::session::SessionManager;
use std::process;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    match run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            error!("Harness failed: {}", e);
            process::exit(2);
        }
    }
}

/// Main application logic. Returns the process exit code: 0 for a normal
/// run, 1 when not a single session could connect (the target is most
/// likely down, which is worth telling apart from a run that merely
/// observed server misbehavior).
async fn run() -> Result<i32> {
    // Parse and validate configuration
    let config = Config::from_args()?;

    // Initialize logging based on verbosity
    init_logging(&config);

    info!("🌊 Flood - TCP Chat Server Load & Behavior Testing Harness");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Print configuration summary
    config.print_summary();

    // Spawn all sessions, await them and render the frozen report
    let mut manager = SessionManager::new(config);
    let report = manager.run().await;
    report.print_report();

    if report.total_clients > 0 && report.connected_count == 0 {
        error!("No session reached the target; is the server up?");
        return Ok(1);
    }

    Ok(0)
}

/// Initialize logging based on configuration
fn init_logging(config: &Config) {
    let flood_level = if config.output.verbose {
        "debug"
    } else {
        "info"
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                format!("flood={}", flood_level)
                    .parse()
                    .expect("Invalid filter directive"),
            ),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default subscriber");

    if config.output.verbose {
        info!("Verbose logging enabled");
    }
}
