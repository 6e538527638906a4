//! Optimistic operation: speculative update, then commit or roll back.
//!
//! An [`OptimisticOperation`] keeps two copies of its state. The committed
//! value is the last one confirmed by the backend; the speculative value is
//! what the user sees. They differ only while a request is in flight.
//!
//! ```text
//!            begin()                settle(Ok)
//!   Idle ─────────────▶ Pending ─────────────▶ Idle
//!    ▲                     │
//!    │ dismiss_error()     │ settle(Err)
//!    │                     ▼
//!    └─────────────────  Failed ──── begin() ──▶ Pending
//! ```
//!
//! The operation is runtime agnostic: [`OptimisticOperation::begin`] applies
//! the speculative update synchronously and hands out a [`Ticket`], and
//! [`OptimisticOperation::settle`] applies the outcome later. Driving the two
//! halves across a simulated network call is the job of
//! [`crate::simulator::OptimisticRequestSimulator`].
//!
//! # Example
//!
//! ```
//! use featuretour_core::optimistic::{OperationStatus, OptimisticOperation};
//! use featuretour_core::OperationError;
//!
//! let mut counter = OptimisticOperation::new(0i64, |count: &i64, delta: &i64| count + delta);
//!
//! let ticket = counter.begin(&1).expect("idle operation accepts a submit");
//! assert_eq!(*counter.speculative(), 1);
//! assert_eq!(counter.status(), OperationStatus::Pending);
//!
//! counter.settle(ticket, Err(OperationError::Backend("Server error".into())));
//! assert_eq!(*counter.speculative(), 0);
//! assert_eq!(counter.error_message(), Some("Server error"));
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::OperationError;

/// Lifecycle state of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    /// Nothing in flight; speculative equals committed
    #[default]
    Idle,
    /// A request is in flight; speculative holds the optimistic value
    Pending,
    /// The last submit failed; an error message is present
    Failed,
}

/// Point-in-time copy of an operation's observable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSnapshot<S> {
    /// Last value confirmed by the backend
    pub committed: S,
    /// Value currently shown to the user
    pub speculative: S,
    /// Lifecycle state
    pub status: OperationStatus,
    /// Present only when `status` is `Failed`
    pub error_message: Option<String>,
}

impl<S> OperationSnapshot<S> {
    /// Returns true while a request is in flight
    pub fn is_pending(&self) -> bool {
        self.status == OperationStatus::Pending
    }
}

/// Handle tying a backend outcome to the submit that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

type UpdateFn<S, P> = Box<dyn Fn(&S, &P) -> S + Send + Sync>;
type ValidateFn<P> = Box<dyn Fn(&P) -> Result<(), String> + Send + Sync>;
type Observer<S> = Box<dyn Fn(&OperationSnapshot<S>) + Send + Sync>;

/// One optimistic mutation, generic over its state `S` and payload `P`.
pub struct OptimisticOperation<S, P> {
    committed: S,
    speculative: S,
    status: OperationStatus,
    error_message: Option<String>,
    update: UpdateFn<S, P>,
    validate: Option<ValidateFn<P>>,
    observers: Vec<Observer<S>>,
    in_flight: Option<Ticket>,
    next_ticket: u64,
}

impl<S: Clone, P> OptimisticOperation<S, P> {
    /// Creates an idle operation whose committed and speculative values are
    /// both `initial`.
    ///
    /// `update` computes the speculative value from the committed value and
    /// the submitted payload.
    pub fn new<F>(initial: S, update: F) -> Self
    where
        F: Fn(&S, &P) -> S + Send + Sync + 'static,
    {
        OptimisticOperation {
            speculative: initial.clone(),
            committed: initial,
            status: OperationStatus::Idle,
            error_message: None,
            update: Box::new(update),
            validate: None,
            observers: Vec::new(),
            in_flight: None,
            next_ticket: 0,
        }
    }

    /// Adds a local precondition checked before any speculative update.
    #[must_use]
    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&P) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validate = Some(Box::new(validate));
        self
    }

    /// Registers a callback invoked with a fresh snapshot after every state
    /// change.
    ///
    /// Callbacks run while the caller holds the operation, so they must not
    /// try to reach the operation again.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&OperationSnapshot<S>) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Last value confirmed by the backend
    pub fn committed(&self) -> &S {
        &self.committed
    }

    /// Value currently shown to the user
    pub fn speculative(&self) -> &S {
        &self.speculative
    }

    /// Current lifecycle state
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// Error from the last failed submit, if the operation is `Failed`
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns true while a request is in flight
    pub fn is_pending(&self) -> bool {
        self.status == OperationStatus::Pending
    }

    /// Copies the observable state
    pub fn snapshot(&self) -> OperationSnapshot<S> {
        OperationSnapshot {
            committed: self.committed.clone(),
            speculative: self.speculative.clone(),
            status: self.status,
            error_message: self.error_message.clone(),
        }
    }

    /// Starts a submit: validates, applies the speculative update and moves
    /// to `Pending`, all before returning.
    ///
    /// # Errors
    ///
    /// - `OperationError::Busy` when a request is already in flight; nothing
    ///   changes.
    /// - `OperationError::Validation` when the validator rejects the
    ///   payload; the operation becomes `Failed` with the validation message
    ///   and its values stay untouched.
    pub fn begin(&mut self, payload: &P) -> Result<Ticket, OperationError> {
        if self.is_pending() {
            tracing::warn!("submit ignored, a request is already in flight");
            return Err(OperationError::Busy);
        }

        if let Some(validate) = &self.validate {
            if let Err(message) = validate(payload) {
                tracing::debug!(%message, "submit rejected by validation");
                self.status = OperationStatus::Failed;
                self.error_message = Some(message.clone());
                self.notify();
                return Err(OperationError::Validation(message));
            }
        }

        self.speculative = (self.update)(&self.committed, payload);
        self.status = OperationStatus::Pending;
        self.error_message = None;

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);

        self.notify();
        Ok(ticket)
    }

    /// Applies the backend outcome for `ticket`.
    ///
    /// Success commits the speculative value and returns to `Idle`. Any
    /// error restores the committed value and moves to `Failed` with the
    /// error's message. Returns false, changing nothing, when `ticket` is
    /// not the request currently in flight.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<(), OperationError>) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::debug!(?ticket, "ignoring outcome for a request that is not in flight");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(()) => {
                self.committed = self.speculative.clone();
                self.status = OperationStatus::Idle;
                self.error_message = None;
                tracing::info!(?ticket, "optimistic update committed");
            }
            Err(err) => {
                if let OperationError::Unexpected(detail) = &err {
                    tracing::error!(?ticket, %detail, "request failed unexpectedly");
                }
                self.speculative = self.committed.clone();
                self.status = OperationStatus::Failed;
                self.error_message = Some(err.to_string());
                tracing::warn!(?ticket, error = %err, "optimistic update rolled back");
            }
        }

        self.notify();
        true
    }

    /// Clears a failure message and returns to `Idle`.
    pub fn dismiss_error(&mut self) {
        if self.status == OperationStatus::Failed {
            self.status = OperationStatus::Idle;
            self.error_message = None;
            self.notify();
        }
    }

    fn notify(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer(&snapshot);
        }
    }
}

impl<S: fmt::Debug, P> fmt::Debug for OptimisticOperation<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimisticOperation")
            .field("committed", &self.committed)
            .field("speculative", &self.speculative)
            .field("status", &self.status)
            .field("error_message", &self.error_message)
            .field("in_flight", &self.in_flight)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counter() -> OptimisticOperation<i64, i64> {
        OptimisticOperation::new(0, |count: &i64, delta: &i64| count + delta)
    }

    fn comments() -> OptimisticOperation<Vec<String>, String> {
        OptimisticOperation::new(vec!["first".to_string()], |list: &Vec<String>, text: &String| {
            let mut next = list.clone();
            next.push(text.clone());
            next
        })
        .with_validator(|text: &String| {
            if text.chars().count() < 3 {
                Err("Comment must be at least 3 characters".to_string())
            } else {
                Ok(())
            }
        })
    }

    #[test]
    fn test_new_is_idle() {
        let op = counter();
        assert_eq!(op.status(), OperationStatus::Idle);
        assert_eq!(op.committed(), op.speculative());
        assert!(op.error_message().is_none());
    }

    #[test]
    fn test_begin_is_speculative_and_pending() {
        let mut op = counter();
        op.begin(&1).expect("idle");
        assert_eq!(*op.speculative(), 1);
        assert_eq!(*op.committed(), 0);
        assert!(op.is_pending());
    }

    #[test]
    fn test_success_commits() {
        let mut op = counter();
        let ticket = op.begin(&1).expect("idle");
        assert!(op.settle(ticket, Ok(())));
        assert_eq!(*op.committed(), 1);
        assert_eq!(*op.speculative(), 1);
        assert_eq!(op.status(), OperationStatus::Idle);
    }

    #[test]
    fn test_failure_rolls_back() {
        let mut op = counter();
        let ticket = op.begin(&1).expect("idle");
        op.settle(
            ticket,
            Err(OperationError::Backend(
                "Server error while updating the counter".into(),
            )),
        );
        assert_eq!(*op.speculative(), 0);
        assert_eq!(op.status(), OperationStatus::Failed);
        assert_eq!(
            op.error_message(),
            Some("Server error while updating the counter")
        );
    }

    #[test]
    fn test_unexpected_error_uses_generic_message() {
        let mut op = counter();
        let ticket = op.begin(&1).expect("idle");
        op.settle(ticket, Err(OperationError::Unexpected("boom".into())));
        assert_eq!(*op.speculative(), 0);
        assert_eq!(op.error_message(), Some(crate::error::UNEXPECTED_MESSAGE));
    }

    #[test]
    fn test_submit_while_pending_is_rejected() {
        let mut op = counter();
        let first = op.begin(&1).expect("idle");
        assert_eq!(op.begin(&5), Err(OperationError::Busy));
        assert_eq!(*op.speculative(), 1);
        op.settle(first, Ok(()));
        assert_eq!(*op.committed(), 1);
    }

    #[test]
    fn test_failed_can_resubmit() {
        let mut op = counter();
        let ticket = op.begin(&1).expect("idle");
        op.settle(ticket, Err(OperationError::Backend("nope".into())));
        let ticket = op.begin(&1).expect("failed operations accept a new submit");
        assert!(op.is_pending());
        assert!(op.error_message().is_none());
        op.settle(ticket, Ok(()));
        assert_eq!(*op.committed(), 1);
    }

    #[test]
    fn test_validation_never_pends() {
        let mut op = comments();
        let err = op.begin(&"hi".to_string()).expect_err("too short");
        assert_eq!(
            err,
            OperationError::Validation("Comment must be at least 3 characters".into())
        );
        assert_eq!(op.status(), OperationStatus::Failed);
        assert_eq!(op.speculative().len(), 1);
        assert_eq!(
            op.error_message(),
            Some("Comment must be at least 3 characters")
        );
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut op = counter();
        let ticket = op.begin(&1).expect("idle");
        op.settle(ticket, Ok(()));
        assert!(!op.settle(ticket, Err(OperationError::Backend("late".into()))));
        assert_eq!(*op.committed(), 1);
        assert_eq!(op.status(), OperationStatus::Idle);
    }

    #[test]
    fn test_dismiss_error() {
        let mut op = counter();
        let ticket = op.begin(&1).expect("idle");
        op.settle(ticket, Err(OperationError::Backend("nope".into())));
        op.dismiss_error();
        assert_eq!(op.status(), OperationStatus::Idle);
        assert!(op.error_message().is_none());
    }

    #[test]
    fn test_observers_see_every_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut op = counter();
        {
            let seen = Arc::clone(&seen);
            op.subscribe(move |snap: &OperationSnapshot<i64>| {
                seen.lock().expect("lock").push((snap.speculative, snap.status));
            });
            let calls = Arc::clone(&calls);
            op.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        let ticket = op.begin(&1).expect("idle");
        op.settle(ticket, Ok(()));

        assert_eq!(
            *seen.lock().expect("lock"),
            vec![(1, OperationStatus::Pending), (1, OperationStatus::Idle)]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_busy_does_not_notify() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut op = counter();
        let c = Arc::clone(&calls);
        op.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        op.begin(&1).expect("idle");
        let _ = op.begin(&1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_snapshot_serializes_status_lowercase() {
        let mut op = counter();
        op.begin(&1).expect("idle");
        let json = serde_json::to_value(op.snapshot()).expect("serialize");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["speculative"], 1);
        assert_eq!(json["committed"], 0);
    }

    proptest! {
        #[test]
        fn prop_commit_and_rollback_laws(
            start in -1000i64..1000,
            steps in prop::collection::vec((-50i64..50, any::<bool>()), 1..32),
        ) {
            let mut op = OptimisticOperation::new(start, |count: &i64, delta: &i64| count + delta);
            for (delta, succeed) in steps {
                let before = *op.committed();
                let ticket = op.begin(&delta).expect("never pending between steps");
                prop_assert_eq!(*op.speculative(), before + delta);
                prop_assert_eq!(op.status(), OperationStatus::Pending);

                let outcome = if succeed { Ok(()) } else { Err(OperationError::Backend("x".into())) };
                op.settle(ticket, outcome);

                prop_assert_ne!(op.status(), OperationStatus::Pending);
                if succeed {
                    prop_assert_eq!(*op.committed(), before + delta);
                    prop_assert_eq!(op.status(), OperationStatus::Idle);
                } else {
                    prop_assert_eq!(*op.speculative(), before);
                    prop_assert_eq!(*op.committed(), before);
                    prop_assert_eq!(op.status(), OperationStatus::Failed);
                    prop_assert!(op.error_message().is_some());
                }
                prop_assert_eq!(op.committed(), op.speculative());
            }
        }
    }
}
