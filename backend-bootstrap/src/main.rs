use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "turnout-backend")]
#[command(about = "Turnout Analytics Backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    // With TURNOUT_LOG_DIR set, logs roll daily into that directory;
    // otherwise they go to stdout. The guard must outlive the server.
    let _log_guard = match std::env::var("TURNOUT_LOG_DIR") {
        Ok(log_dir) => {
            let appender = tracing_appender::rolling::daily(log_dir, "turnout-backend.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::fmt().with_env_filter(env_filter()).init();
            None
        }
    };

    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("TURNOUT_CONFIG", config);
    }

    backend_bootstrap::run().await
}
