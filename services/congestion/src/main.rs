use clap::{Arg, ArgAction, ArgMatches, Command};
use congestion::config::{Overrides, load_config_from_path};
use congestion::group::exit_code;
use congestion::output::write_reports;
use congestion::{CongestionConfig, MalformedPolicy, OutputFormat};
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use tracing::{error, info};

fn validate_workers_value(value: &str) -> Result<u32, String> {
    congestion::util::is_worker_count(value.to_owned())?;
    value
        .parse::<u32>()
        .map_err(|_| "Invalid worker count".to_owned())
}

fn validate_rank_value(value: &str) -> Result<u32, String> {
    congestion::util::is_rank(value.to_owned())?;
    value.parse::<u32>().map_err(|_| "Invalid rank".to_owned())
}

fn validate_top_value(value: &str) -> Result<usize, String> {
    congestion::util::is_top_k(value.to_owned())?;
    value
        .parse::<usize>()
        .map_err(|_| "Invalid report length".to_owned())
}

fn validate_config_file(value: &str) -> Result<String, String> {
    congestion::util::is_file(value.to_owned())?;
    Ok(value.to_owned())
}

fn validate_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::try_from(value).map_err(|e| e.to_string())
}

fn command() -> Command {
    Command::new("Traffic Congestion Report")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Shards traffic sensor records across a worker group and reports each worker's busiest sensors")
        .arg(
            Arg::new("file")
                .help("The file to read sensor records from [default: data.txt]")
                .short('f')
                .long("file"),
        )
        .arg(
            Arg::new("workers")
                .help("Number of workers in the group [default: 1]")
                .short('n')
                .long("workers")
                .value_parser(validate_workers_value),
        )
        .arg(
            Arg::new("rank")
                .help("Run only this worker of the group")
                .short('r')
                .long("rank")
                .value_parser(validate_rank_value),
        )
        .arg(
            Arg::new("top")
                .help("Sensors to report per worker [default: 3]")
                .short('k')
                .long("top")
                .value_parser(validate_top_value),
        )
        .arg(
            Arg::new("strict")
                .help("Stop a worker at the first malformed line instead of skipping it")
                .long("strict")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .help("Output format: text or json [default: text]")
                .long("format")
                .value_parser(validate_format),
        )
        .arg(
            Arg::new("config")
                .help("TOML config file; command line flags take precedence")
                .short('c')
                .long("config")
                .value_parser(validate_config_file),
        )
}

fn overrides(matches: &ArgMatches) -> Overrides {
    Overrides {
        input: matches.get_one::<String>("file").map(PathBuf::from),
        workers: matches.get_one::<u32>("workers").copied(),
        rank: matches.get_one::<u32>("rank").copied(),
        top_k: matches.get_one::<usize>("top").copied(),
        malformed: matches
            .get_flag("strict")
            .then_some(MalformedPolicy::Fail),
        format: matches.get_one::<OutputFormat>("format").copied(),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let base = match matches.get_one::<String>("config") {
        Some(path) => load_config_from_path(Path::new(path)),
        None => Ok(CongestionConfig::default()),
    };
    let config = match base.and_then(|c| c.with_overrides(&overrides(&matches))) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), format = %config.format, "congestion starting");

    let outcomes = match congestion::run_group(&config).await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    for outcome in &outcomes {
        if let Err(ref e) = outcome.result {
            eprintln!("{e}");
        }
    }
    if let Err(e) = write_reports(&mut std::io::stdout().lock(), &outcomes, config.format) {
        error!(error = %e, "failed to write report");
        std::process::exit(1);
    }

    std::process::exit(exit_code(&outcomes));
}
