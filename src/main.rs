use outbreak_dashboard::{load_snapshot, router, AppState, Dashboard, Settings};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env();

    let dashboard = match load_snapshot(&settings)
        .await
        .and_then(|snapshot| Dashboard::build(&snapshot, &settings))
    {
        Ok(dashboard) => dashboard,
        Err(err) => {
            error!("startup failed: {err}");
            return Err(err.into());
        }
    };

    let app = router(AppState::new(dashboard));
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
