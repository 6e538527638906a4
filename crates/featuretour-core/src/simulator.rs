//! Simulated backend and the driver that runs optimistic requests against it.
//!
//! The backend is an injectable [`RemoteCall`]; the stock
//! [`SimulatedBackend`] waits a fixed latency and then asks an
//! [`OutcomeSource`] whether the call succeeded. Tests plug in
//! [`FixedOutcome`] or [`ScriptedOutcomes`] instead of relying on chance.
//!
//! There is no cancellation: once submitted, a request always settles after
//! its latency, either committing or rolling back.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::{CoreError, CoreResult, OperationError};
use crate::optimistic::{OperationSnapshot, OperationStatus, OptimisticOperation};

/// Result drawn for one simulated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted the request
    Success,
    /// The backend rejected the request
    Failure,
}

/// Decides the outcome of each simulated call.
pub trait OutcomeSource: Send + Sync {
    /// Draws the outcome for the next call.
    fn draw(&self) -> Outcome;
}

/// Fails each call independently with a fixed probability.
pub struct RandomOutcomes {
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl RandomOutcomes {
    /// Creates a source seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFailureRate` unless `failure_rate` lies in
    /// `0.0..=1.0`.
    pub fn new(failure_rate: f64) -> CoreResult<Self> {
        Self::with_rng(failure_rate, StdRng::from_os_rng())
    }

    /// Creates a reproducible source.
    ///
    /// # Errors
    ///
    /// Same as [`RandomOutcomes::new`].
    pub fn seeded(failure_rate: f64, seed: u64) -> CoreResult<Self> {
        Self::with_rng(failure_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(failure_rate: f64, rng: StdRng) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(CoreError::InvalidFailureRate(failure_rate));
        }
        Ok(RandomOutcomes {
            failure_rate,
            rng: Mutex::new(rng),
        })
    }

    /// Configured failure probability
    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl OutcomeSource for RandomOutcomes {
    fn draw(&self) -> Outcome {
        if self.rng.lock().random_bool(self.failure_rate) {
            Outcome::Failure
        } else {
            Outcome::Success
        }
    }
}

impl fmt::Debug for RandomOutcomes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomOutcomes")
            .field("failure_rate", &self.failure_rate)
            .finish_non_exhaustive()
    }
}

/// Always returns the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub Outcome);

impl OutcomeSource for FixedOutcome {
    fn draw(&self) -> Outcome {
        self.0
    }
}

/// Replays a queue of outcomes, then succeeds forever.
#[derive(Debug, Default)]
pub struct ScriptedOutcomes {
    queue: Mutex<VecDeque<Outcome>>,
}

impl ScriptedOutcomes {
    /// Creates a script from outcomes in call order
    pub fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        ScriptedOutcomes {
            queue: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    /// Outcomes not yet drawn
    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn draw(&self) -> Outcome {
        self.queue.lock().pop_front().unwrap_or(Outcome::Success)
    }
}

/// A remote call that eventually succeeds or fails.
pub trait RemoteCall<P>: Send + Sync + 'static {
    /// Performs the call for `payload`.
    fn call(&self, payload: P) -> impl Future<Output = Result<(), OperationError>> + Send;
}

/// Backend that sleeps for a fixed latency, then draws an outcome.
#[derive(Clone)]
pub struct SimulatedBackend {
    latency: Duration,
    failure_message: String,
    source: Arc<dyn OutcomeSource>,
}

impl SimulatedBackend {
    /// Creates a backend with an explicit outcome source.
    pub fn new(
        latency: Duration,
        failure_message: impl Into<String>,
        source: impl OutcomeSource + 'static,
    ) -> Self {
        SimulatedBackend {
            latency,
            failure_message: failure_message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a backend that fails with probability `failure_rate`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFailureRate` for rates outside `0.0..=1.0`.
    pub fn random(
        latency: Duration,
        failure_rate: f64,
        failure_message: impl Into<String>,
    ) -> CoreResult<Self> {
        Ok(Self::new(
            latency,
            failure_message,
            RandomOutcomes::new(failure_rate)?,
        ))
    }

    /// Simulated network latency
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Message reported when a call fails
    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }
}

impl fmt::Debug for SimulatedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedBackend")
            .field("latency", &self.latency)
            .field("failure_message", &self.failure_message)
            .finish_non_exhaustive()
    }
}

impl<P: Send + 'static> RemoteCall<P> for SimulatedBackend {
    fn call(&self, _payload: P) -> impl Future<Output = Result<(), OperationError>> + Send {
        let latency = self.latency;
        let source = Arc::clone(&self.source);
        let message = self.failure_message.clone();
        async move {
            tokio::time::sleep(latency).await;
            match source.draw() {
                Outcome::Success => Ok(()),
                Outcome::Failure => Err(OperationError::Backend(message)),
            }
        }
    }
}

/// Shared handle to an operation driven by a simulator.
pub type SharedOperation<S, P> = Arc<Mutex<OptimisticOperation<S, P>>>;

/// Runs optimistic submits against a backend on the tokio runtime.
///
/// The speculative update happens inside [`submit`](Self::submit) before it
/// returns; the commit or rollback happens on a spawned task once the
/// backend answers.
pub struct OptimisticRequestSimulator<S, P, B> {
    operation: SharedOperation<S, P>,
    backend: Arc<B>,
}

impl<S, P, B> OptimisticRequestSimulator<S, P, B>
where
    S: Clone + Send + 'static,
    P: Send + 'static,
    B: RemoteCall<P>,
{
    /// Wraps `operation` so submits go through `backend`.
    pub fn new(operation: OptimisticOperation<S, P>, backend: B) -> Self {
        OptimisticRequestSimulator {
            operation: Arc::new(Mutex::new(operation)),
            backend: Arc::new(backend),
        }
    }

    /// Shared handle to the wrapped operation
    pub fn operation(&self) -> &SharedOperation<S, P> {
        &self.operation
    }

    /// Copies the operation's observable state
    pub fn snapshot(&self) -> OperationSnapshot<S> {
        self.operation.lock().snapshot()
    }

    /// Returns true while a request is in flight
    pub fn is_pending(&self) -> bool {
        self.operation.lock().is_pending()
    }

    /// Registers a state-change callback on the wrapped operation
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&OperationSnapshot<S>) + Send + Sync + 'static,
    {
        self.operation.lock().subscribe(observer);
    }

    /// Clears a failure message
    pub fn dismiss_error(&self) {
        self.operation.lock().dismiss_error();
    }

    /// Submits `payload`.
    ///
    /// The returned handle resolves to the final status once the backend has
    /// answered. A panic inside the backend call settles the operation as
    /// `OperationError::Unexpected`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the error from [`OptimisticOperation::begin`]: `Busy` while a
    /// request is in flight, `Validation` when the payload is rejected.
    pub fn submit(&self, payload: P) -> Result<JoinHandle<OperationStatus>, OperationError> {
        let ticket = self.operation.lock().begin(&payload)?;
        tracing::info!(?ticket, "optimistic request submitted");

        let operation = Arc::clone(&self.operation);
        let backend = Arc::clone(&self.backend);
        Ok(tokio::spawn(async move {
            let call = tokio::spawn(async move { backend.call(payload).await });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(OperationError::Unexpected(join_error.to_string())),
            };

            let mut operation = operation.lock();
            operation.settle(ticket, outcome);
            operation.status()
        }))
    }

    /// Submits `payload` and waits until it settles.
    ///
    /// # Errors
    ///
    /// Same as [`submit`](Self::submit).
    pub async fn submit_and_wait(&self, payload: P) -> Result<OperationStatus, OperationError> {
        let handle = self.submit(payload)?;
        handle
            .await
            .map_err(|join_error| OperationError::Unexpected(join_error.to_string()))
    }
}

impl<S: fmt::Debug, P, B> fmt::Debug for OptimisticRequestSimulator<S, P, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimisticRequestSimulator")
            .field("operation", &*self.operation.lock())
            .finish_non_exhaustive()
    }
}
