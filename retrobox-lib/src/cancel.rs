use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between the foreground and a worker.
///
/// Workers poll [`CancelToken::is_cancelled`] once per catalog item and once
/// per wait tick; nothing is interrupted mid-item.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Return `Err(LibError::Cancelled)` once the token has been raised.
    pub fn check(&self) -> Result<(), crate::LibError> {
        if self.is_cancelled() {
            Err(crate::LibError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let worker = token.clone();
        assert!(!worker.is_cancelled());
        token.cancel();
        assert!(worker.is_cancelled());
        assert!(matches!(worker.check(), Err(crate::LibError::Cancelled)));
    }
}
