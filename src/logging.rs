use std::error::Error;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

const DEFAULT_FILTER: &str = "leadform=info";

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `leadform=info`.
pub fn init_logging() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Logs an error the host could not handle. Nothing else happens.
pub fn log_error(context: &str, error: &(dyn Error + 'static)) {
    tracing::error!(context, error = %error_chain(error), "unhandled error");
}

/// Logs panics before handing them to the previously installed hook.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_default();
        tracing::error!(%location, panic = %info, "uncaught panic");
        previous(info);
    }));
}

pub(crate) fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
