use anyhow::{Context, Result};
use rand::prelude::*;
use rand_pcg::Pcg64;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use traffic_synthesiser::configuration::GenerationConfig;

/// Produces synthetic daily web-analytics tables for the grammy and recording academy sites.
#[derive(StructOpt)]
struct Cli {
    /// The path to the directory to write to. It is created if it does not exist.
    #[structopt(parse(from_os_str), default_value = "datasets")]
    path: std::path::PathBuf,

    /// Set seed to get reproducible results on consecutive runs
    #[structopt(short = "s", long = "seed")]
    seed: Option<u64>,

    /// JSON file replacing the built-in generation parameters
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::from_args();
    let config = match args.config.as_ref() {
        Some(config_path) => GenerationConfig::from_json_file(config_path)?,
        None => GenerationConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };
    let path = &args.path;
    traffic_synthesiser::run(path, &config, &mut rng)
        .with_context(|| "The creation of the synthetic traffic files failed")?;
    println!(
        "Generated synthetic traffic files successfully in {:?}",
        path.as_os_str()
    );

    Ok(())
}
