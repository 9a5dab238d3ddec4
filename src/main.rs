use clap::Parser;
use routestack::Scenario;
use routestack::core::config::{self, CliOverrides};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "routestack", about = "Step-by-step route transitions for coordinator flows")]
struct Args {
    /// Route list the demo coordinator runs on
    #[arg(short, long, value_enum)]
    scenario: Option<Scenario>,

    /// Pause between structural route changes, in milliseconds
    #[arg(short, long)]
    delay_ms: Option<u64>,

    /// Config file to use instead of ~/.routestack/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            step_delay_ms: args.delay_ms,
            scenario: args.scenario,
        },
    );

    // Logs go to stderr so stdout stays one JSON snapshot per line
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = TermLogger::init(
        resolved.log_level,
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    log::info!("Routestack starting with {:?}", resolved);

    let mut stdout = std::io::stdout().lock();
    routestack::demo::run(&resolved, &mut stdout).await
}
