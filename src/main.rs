mod run;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pettycash::config::OutletConfig;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() == 1 {
        run::print_usage();
        return Ok(());
    }
    if let Some(result) = run::without_config(&args[1]) {
        return result;
    }

    let config_path = OutletConfig::default_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    let config = OutletConfig::load(&config_path)?;
    init_logging(&config.log_level);

    run::as_cli(&args, &config, &config_path)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("pettycash={level}")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
