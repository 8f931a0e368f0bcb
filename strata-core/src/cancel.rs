use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use thiserror::Error;

/// Why a unit of work was stopped before it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupt {
    #[error("cancellation requested")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// A cooperative cancellation signal with an optional deadline.
///
/// Clones share the same flag, so cancelling any clone cancels them all.
/// The deadline is per clone: [`CancelToken::with_deadline`] narrows it
/// without affecting the token it was derived from.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation for every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Derive a token sharing this flag that also expires at `deadline`.
    ///
    /// An existing earlier deadline is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };
        Self {
            flag: Arc::clone(&self.flag),
            deadline: Some(deadline),
        }
    }

    /// Derive a token that expires `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    /// Return the interrupt reason if work should stop.
    pub fn check(&self) -> Result<(), Interrupt> {
        if self.flag.load(Ordering::Acquire) {
            return Err(Interrupt::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupt::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_live() {
        let token = CancelToken::new();
        assert!(token.check().is_ok());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert_eq!(token.check(), Err(Interrupt::Cancelled));
    }

    #[test]
    fn test_derived_token_shares_flag() {
        let parent = CancelToken::new();
        let child = parent.with_timeout(Duration::from_secs(60));
        parent.cancel();
        assert_eq!(child.check(), Err(Interrupt::Cancelled));
    }

    #[test]
    fn test_expired_deadline() {
        let token = CancelToken::new().with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(token.check(), Err(Interrupt::DeadlineExceeded));
    }

    #[test]
    fn test_deadline_keeps_earliest() {
        let now = Instant::now();
        let early = CancelToken::new().with_deadline(now + Duration::from_secs(1));
        let narrowed = early.with_deadline(now + Duration::from_secs(10));
        assert_eq!(narrowed.deadline(), Some(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_deadline_does_not_leak_to_parent() {
        let parent = CancelToken::new();
        let _child = parent.with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(parent.check().is_ok());
    }
}
