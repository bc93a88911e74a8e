use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON subscriber, filtered by `RUST_LOG`.
///
/// Idempotent: a later call loses the `try_init` race and is dropped, so
/// test binaries may call it from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_tolerate_repeated_initialization() {
        for _ in 0..3 {
            init_tracing();
        }
    }
}
