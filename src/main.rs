use std::error::Error;

use qna_service::telemetry;
use tracing::Level;
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    allow_missing_dotenv(dotenvy::dotenv())?;

    let filter = telemetry::env_filter(Level::INFO, Level::INFO);

    // qna_service events go through its own layer; everything else here.
    let app_layer = fmt::layer().with_target(false).with_filter(filter::filter_fn(|meta| {
        !meta.target().starts_with(telemetry::TARGET_PREFIX)
    }));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(telemetry::layer())
        .init();

    api::start().await?;

    Ok(())
}

/// A missing `.env` is fine; a malformed one is not.
fn allow_missing_dotenv<T>(res: Result<T, dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match res {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e),
    }
}
