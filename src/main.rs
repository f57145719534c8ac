use boss_admin::config::{Cli, Config};
use clap::Parser;
use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        addr = %cfg.addr,
        dsn = %cfg.dsn,
        ui_dir = %cfg.ui_dir.display(),
        loglevel = %cfg.loglevel,
        shutdown_timeout = cfg.shutdown_timeout
    );

    boss_admin::server::run(cfg).await?;
    Ok(())
}
