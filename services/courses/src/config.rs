/// Courses service configuration loaded from environment variables.
#[derive(Debug)]
pub struct CoursesConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3121). Env var: `COURSES_PORT`.
    pub courses_port: u16,
    /// Base URL of the hosted payment provider (e.g. "https://pay.example.com").
    pub payment_api_url: String,
    /// API key for the payment provider.
    pub payment_api_key: String,
    /// Base URL of the notification dispatcher.
    pub notifier_url: String,
}

impl CoursesConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            courses_port: std::env::var("COURSES_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3121),
            payment_api_url: std::env::var("PAYMENT_API_URL").expect("PAYMENT_API_URL"),
            payment_api_key: std::env::var("PAYMENT_API_KEY").expect("PAYMENT_API_KEY"),
            notifier_url: std::env::var("NOTIFIER_URL").expect("NOTIFIER_URL"),
        }
    }
}
