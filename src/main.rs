use clap::Parser;
use smartfinance::args::{Args, Command};
use smartfinance::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for exercising the advise command without contacting the Gemini API. When
    // SMARTFINANCE_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Gemini.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Catalog => commands::catalog().print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add(&config, add_args.clone())?.print()
        }

        Command::Remove(remove_args) => {
            let config = Config::load(home).await?;
            commands::remove(&config, remove_args.clone())?.print()
        }

        Command::List => commands::list(&Config::load(home).await?)?.print(),

        Command::Save => commands::save(&Config::load(home).await?)?.print(),

        Command::Dashboard => commands::dashboard(&Config::load(home).await?)?.print(),

        Command::Advise(advise_args) => {
            let config = Config::load(home).await?;
            commands::advise(&config, mode, advise_args).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
