use dbroster::{Config, init_tracing, run};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let (config, source) = Config::load()?;
    init_tracing(&config.general.log_level);

    match &source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    config.validate()?;

    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(config))
}
