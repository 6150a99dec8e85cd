use actix_web::{web, App, HttpServer, Responder};
use rdkafka::producer::FutureProducer;
use shared::config::ResolvedEndpoints;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

async fn health() -> impl Responder {
    "OK"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let endpoints = ResolvedEndpoints::load().map_err(|e| {
        error!(%e, "invalid configuration");
        e
    })?;
    info!(
        sources_api_url = %endpoints.sources_api_url,
        sources_api_health_url = %endpoints.sources_api_health_url,
        kafka_url = %endpoints.kafka_url,
        port = %endpoints.listen_port,
        "resolved endpoints"
    );

    let _producer: FutureProducer = shared::kafka::client_config(&endpoints)
        .set("message.timeout.ms", "5000")
        .create()?;

    let bind = format!("0.0.0.0:{}", endpoints.listen_port);
    info!("starting sources worker on {}", bind);

    HttpServer::new(|| App::new().route("/health", web::get().to(health)))
        .bind(bind)?
        .run()
        .await?;
    Ok(())
}
