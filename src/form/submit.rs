use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_timer::Delay;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::validation::FormValues;
use crate::config::ConfigError;

/// Opaque acknowledgement returned by a successful submission.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ack {
    reference: Option<String>,
}

impl Ack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("submission failed: {reason}")]
pub struct SubmitError {
    reason: String,
}

impl SubmitError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmissionResult {
    Success(FormValues),
    Failure(String),
}

pub type BoxedSubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<Ack, SubmitError>> + Send + 'a>>;

/// The external operation that actually sends the form.
pub trait SubmitBackend: Send + Sync {
    fn submit<'a>(&'a self, values: &'a FormValues) -> BoxedSubmitFuture<'a>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulatedBackendConfig {
    latency: Duration,
    failure_rate: f64,
    seed: Option<u64>,
}

impl SimulatedBackendConfig {
    pub fn new(latency: Duration, failure_rate: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(ConfigError::FailureRate(failure_rate));
        }
        Ok(Self {
            latency,
            failure_rate,
            seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for SimulatedBackendConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(2_000),
            failure_rate: 0.1,
            seed: None,
        }
    }
}

/// Stand-in backend: waits for the configured latency, then fails at random
/// with the configured probability.
pub struct SimulatedBackend {
    config: SimulatedBackendConfig,
    rng: Mutex<StdRng>,
    sequence: AtomicU64,
}

impl SimulatedBackend {
    pub fn new(config: SimulatedBackendConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &SimulatedBackendConfig {
        &self.config
    }

    fn roll_failure(&self) -> bool {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_bool(self.config.failure_rate)
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(SimulatedBackendConfig::default())
    }
}

impl SubmitBackend for SimulatedBackend {
    fn submit<'a>(&'a self, values: &'a FormValues) -> BoxedSubmitFuture<'a> {
        Box::pin(async move {
            if !self.config.latency.is_zero() {
                Delay::new(self.config.latency).await;
            }
            if self.roll_failure() {
                return Err(SubmitError::new("simulated network failure"));
            }
            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(sequence, fields = values.len(), "simulated submit accepted");
            Ok(Ack::with_reference(format!("sim-{sequence}")))
        })
    }
}
