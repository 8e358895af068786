use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "coverfetch=info,tower_http=info";

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set and falls back to
/// [`DEFAULT_FILTER`] otherwise.
pub fn init_tracing() -> crate::Res<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
