//! Cancellable, deadline-bound execution scopes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a scope ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeEnd {
    /// The caller canceled the scope.
    Canceled,
    /// The scope deadline passed.
    DeadlineExceeded,
}

/// Cancels every scope derived from the one it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_modify(|canceled| *canceled = true);
    }

    /// Returns whether cancellation was signalled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Caller-supplied bound on an execution: an optional deadline and an
/// optional cancellation signal.
///
/// Child scopes share the parent's cancellation signal and never outlive
/// its deadline.
#[derive(Debug, Clone, Default)]
pub struct ExecutionScope {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl ExecutionScope {
    /// Creates an unbounded scope that is never canceled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Creates a scope with its cancel handle.
    #[must_use]
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let scope = Self {
            cancel: Some(receiver),
            deadline: None,
        };
        (scope, CancelHandle { sender })
    }

    /// Bounds the scope to end `timeout` from now, keeping any earlier
    /// deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Some(candidate) = Instant::now().checked_add(timeout) {
            self.deadline = Some(Self::earliest(self.deadline, candidate));
        }
        self
    }

    /// Derives a child scope bounded by `timeout`.
    #[must_use]
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        self.clone().with_timeout(timeout)
    }

    fn earliest(current: Option<Instant>, candidate: Instant) -> Instant {
        current.map_or(candidate, |existing| existing.min(candidate))
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reports whether the scope has already ended.
    ///
    /// Cancellation wins over an expired deadline.
    #[must_use]
    pub fn state(&self) -> Option<ScopeEnd> {
        if self.cancel.as_ref().is_some_and(|receiver| *receiver.borrow()) {
            return Some(ScopeEnd::Canceled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(ScopeEnd::DeadlineExceeded);
        }
        None
    }

    /// Resolves when the scope is canceled or its deadline passes.
    ///
    /// Never resolves for a background scope.
    pub async fn done(&self) -> ScopeEnd {
        let mut cancel = self.cancel.clone();
        let canceled = async move {
            let signalled = match cancel.as_mut() {
                Some(receiver) => receiver.wait_for(|flag| *flag).await.is_ok(),
                None => false,
            };
            if !signalled {
                std::future::pending::<()>().await;
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = canceled => ScopeEnd::Canceled,
            () = expired => ScopeEnd::DeadlineExceeded,
        }
    }
}
