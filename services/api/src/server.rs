use crate::cli::ServeArgs;
use crate::infra::{build_classifier, AppState, ConfiguredScorer};
use crate::routes::with_reward_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use releaf_rewards::config::AppConfig;
use releaf_rewards::error::AppError;
use releaf_rewards::rewards::{HttpImageSource, PipelineLimits, RewardPipeline, ScoringService};
use releaf_rewards::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let classifier = Arc::new(build_classifier(config.rewards.model_path.as_deref())?);
    let scoring = ScoringService::new(classifier);
    let client = reqwest::Client::new();
    let scorer = ConfiguredScorer::from_config(&config.rewards, client.clone(), scoring.clone());

    let limits = PipelineLimits {
        fetch_timeout: config.rewards.fetch_timeout,
        scoring_timeout: config.rewards.scoring_timeout,
    };
    let pipeline = Arc::new(RewardPipeline::new(
        Arc::new(HttpImageSource::new(client)),
        Arc::new(scorer),
        limits,
    ));

    let app = with_reward_routes(pipeline, Arc::new(scoring))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "reward scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
