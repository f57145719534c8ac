use crate::config::Config;
use crate::db;
use crate::error::BossError;
use crate::router::{BossState, PAGES, boss_router};
use crate::templates::TemplateCache;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Bootstrap storage and templates, then serve until SIGINT/SIGTERM.
pub async fn run(cfg: Config) -> Result<(), BossError> {
    let players = db::connect(&cfg.dsn).await?;
    let templates = TemplateCache::build(&cfg.templates_dir())?.require(&PAGES)?;
    let state = BossState::new(players, templates);
    let app = boss_router(state, &cfg.static_dir());

    let listener = TcpListener::bind(&cfg.addr).await?;
    info!(addr = %cfg.addr, "BOSS Admin server - start listening");
    serve_until(listener, app, cfg.shutdown_timeout(), shutdown_signal()).await
}

/// Serve `app` until `stop` resolves, then give in-flight requests up to
/// `grace` to finish before abandoning them.
pub async fn serve_until(
    listener: TcpListener,
    app: Router,
    grace: Duration,
    stop: impl Future<Output = ()>,
) -> Result<(), BossError> {
    let notify = Arc::new(Notify::new());
    let notified = notify.clone();
    let mut server: JoinHandle<std::io::Result<()>> = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { notified.notified().await })
        .await
    });

    tokio::select! {
        res = &mut server => return join_result(res),
        _ = stop => {}
    }

    warn!(grace_secs = grace.as_secs(), "attempting graceful shutdown");
    // notify_one keeps the permit if the server is not waiting yet
    notify.notify_one();
    match tokio::time::timeout(grace, &mut server).await {
        Ok(res) => {
            join_result(res)?;
            info!("graceful shutdown performed successfully");
        }
        Err(_) => {
            warn!("shutdown deadline elapsed; abandoning in-flight requests");
            server.abort();
        }
    }
    Ok(())
}

fn join_result(
    res: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), BossError> {
    match res {
        Ok(inner) => Ok(inner?),
        Err(e) => Err(BossError::Io(std::io::Error::other(e))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
