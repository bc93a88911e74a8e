use sea_orm::Database;
use tracing::info;

use learnhub_courses::config::CoursesConfig;
use learnhub_courses::infra::notify::HttpNotifier;
use learnhub_courses::infra::payment::HttpPaymentGateway;
use learnhub_courses::router::build_router;
use learnhub_courses::state::AppState;

#[tokio::main]
async fn main() {
    learnhub_core::tracing::init_tracing();

    let config = CoursesConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http_client = reqwest::Client::new();
    let state = AppState {
        db,
        payment: HttpPaymentGateway {
            client: http_client.clone(),
            base_url: config.payment_api_url.trim_end_matches('/').to_owned(),
            api_key: config.payment_api_key,
        },
        notifier: HttpNotifier {
            client: http_client,
            base_url: config.notifier_url.trim_end_matches('/').to_owned(),
        },
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.courses_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("courses service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
