use crate::{
    config::Config,
    model_service::ModelService,
    ort_service::OrtModelService,
    predictor::PosturePredictor,
    routes::api_routes,
    state::SharedState,
    telemetry::Metrics,
};
use axum::{extract::DefaultBodyLimit, Router};
use axum_otel_metrics::HttpMetricsLayerBuilder;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};

pub fn build_router<M: ModelService>(state: SharedState<M>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.upload.max_size_bytes());
    let metrics_layer = HttpMetricsLayerBuilder::new().build();

    Router::new()
        .merge(api_routes::<M>())
        .layer(body_limit)
        .with_state(state)
        .layer(metrics_layer)
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<M: ModelService>(state: SharedState<M>, config: &Config) -> anyhow::Result<Self> {
        let addr = config.server.get_address();
        let router = build_router(state);
        let listener = TcpListener::bind(&addr).await?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("Posture service listening on {}", self.listener.local_addr()?);

        let shutdown = async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown")
        };

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Loads the model and serves the API. A model that fails to load leaves the
/// service up in a degraded state rather than aborting startup.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let metrics = Arc::new(Metrics::new()?);

    let predictor = OrtModelService::new(&config.model)
        .and_then(|model_service| PosturePredictor::new(model_service, &config.model));
    let predictor = match predictor {
        Ok(predictor) => Some(predictor),
        Err(e) => {
            tracing::error!("Failed to load posture model: {}", e);
            None
        }
    };

    let state = SharedState::new(predictor, config.upload.clone(), metrics);
    tracing::info!("Model status: {}", state.model_status());

    let server = HttpServer::new(state, &config).await?;
    server.run().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
