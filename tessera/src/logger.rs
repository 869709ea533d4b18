//! Log output for the runner.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::{Context as _, Result};
use tracing::{Event, Level, Subscriber, subscriber::set_global_default};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::Context, prelude::*};

/// Counts every warning or error that passes the filter.
#[derive(Clone, Default)]
pub struct WarningCounter(Arc<AtomicUsize>);

impl WarningCounter {
    /// Warnings and errors seen so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= Level::WARN {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Installs the global subscriber and routes `log` records into it.
///
/// `RUST_LOG` overrides `default_directive`.
pub fn init(default_directive: &str) -> Result<WarningCounter> {
    LogTracer::init().context("a logger is already installed")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let counter = WarningCounter::default();
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(counter.clone());
    set_global_default(subscriber).context("a subscriber is already installed")?;
    Ok(counter)
}
