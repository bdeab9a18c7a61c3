use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::debug;

use alnstats::{output, Cli, Config, UsageError};

fn main() {
    let args = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .format_timestamp_millis()
        .init();

    let config = match Config::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            let kind = match e {
                UsageError::MissingFileOperand
                | UsageError::MissingReference(_)
                | UsageError::RegionWithoutChromosome => ErrorKind::MissingRequiredArgument,
                _ => ErrorKind::ValueValidation,
            };
            let mut cmd = Cli::command();
            cmd.error(kind, e).exit();
        }
    };

    if let Err(e) = alnstats::run(&config) {
        if output::is_consumer_closed(&e) {
            debug!("Output closed by consumer, stopping.");
            process::exit(0);
        }
        eprintln!("Error: {:?}", e);
        process::exit(1);
    }
}
