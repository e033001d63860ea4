use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Build a JSON subscriber writing to `sink`.
///
/// `RUST_LOG` wins over `default_filter` when set. Token events only ever
/// carry failure reasons and ids, never key material.
pub fn get_subscriber<Sink>(default_filter: &str, sink: Sink) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(sink)
        .json();

    Registry::default().with(env_filter).with(formatting_layer)
}

/// Install `subscriber` as the process-wide default. Call once at startup.
pub fn init_telemetry(subscriber: impl Subscriber + Send + Sync + 'static) -> Result<(), TryInitError> {
    subscriber.try_init()
}
