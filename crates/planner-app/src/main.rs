use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use planner_app::app::api::routes;
use planner_app::config::ConfigHandler;
use planner_app::planner_handler::PlannerServiceHandler;
use planner_core::config::load_config;
use planner_service::planner::{
    EventRepository, InMemoryEventRepository, PlannerService, SystemClock,
};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting planner server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let timezone = config.planner.tz()?;

    let repository: Arc<dyn EventRepository> = match &config.storage.seed {
        Some(path) => Arc::new(InMemoryEventRepository::from_seed_file(path).await?),
        None => Arc::new(InMemoryEventRepository::new()),
    };

    let planner = Arc::new(PlannerService::new(
        repository,
        Arc::new(SystemClock),
        timezone,
    ));

    tracing::info!(timezone = timezone.name(), today = %planner.today(), "Planner ready");

    let mut changes = planner.subscribe();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => tracing::debug!(?change, "Event store changed"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Change log fell behind the event store");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler::new(config))
        .hoop(PlannerServiceHandler { service: planner })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
