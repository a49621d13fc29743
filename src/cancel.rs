//! Cooperative cancellation token

use crate::error::{AudioError, AudioResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag checked at every blocking step of the pipeline.
///
/// The token is set at most once (false → true, never reset) and may be set
/// from any thread while the pipeline worker observes it. Cloning is cheap;
/// all clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-canceled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Return `Err(AudioError::Canceled)` if the token is set.
    ///
    /// Inserted before/after each decode unit and encode frame so a set
    /// token unwinds the current operation via `?`.
    pub fn check(&self) -> AudioResult<()> {
        if self.is_canceled() {
            Err(AudioError::Canceled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_passes() {
        let token = CancelToken::new();
        assert!(!token.is_canceled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_cancel_is_sticky_and_shared() {
        let token = CancelToken::new();
        let clone = token.clone();

        clone.cancel();
        clone.cancel();

        assert!(token.is_canceled());
        assert!(matches!(token.check(), Err(AudioError::Canceled)));
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let token = CancelToken::new();
        let remote = token.clone();

        let handle = std::thread::spawn(move || remote.cancel());
        handle.join().unwrap();

        assert!(token.is_canceled());
    }
}
