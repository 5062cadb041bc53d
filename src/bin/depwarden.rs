use clap::Parser;
use colored::Colorize;
use depwarden_core::cli::{self, Cli};
use depwarden_core::exit::DepwardenExit;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "depwarden_core=debug" } else { "depwarden_core=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("DEPWARDEN_LOG").unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> DepwardenExit {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = if let Some(cmd) = cli.command {
        cli::dispatch::execute(cmd)
    } else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        Ok(DepwardenExit::Success)
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            DepwardenExit::Error
        }
    }
}
