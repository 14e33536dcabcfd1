use std::sync::Arc;
use tokio::sync::watch;

/// Creates a linked handle/token pair, initially not cancelled.
pub fn cancellation() -> (CancellationHandle, CancellationToken) {
    let (sender, receiver) = watch::channel(false);
    (
        CancellationHandle {
            sender: Arc::new(sender),
        },
        CancellationToken { receiver },
    )
}

/// Requests cancellation of every token created alongside it.
#[derive(Clone)]
pub struct CancellationHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Polled by workers between pipeline stages.
#[derive(Clone)]
pub struct CancellationToken {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Token that can never be cancelled.
    pub fn never() -> Self {
        let (handle, token) = cancellation();
        drop(handle);
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_seen_by_every_clone() {
        let (handle, token) = cancellation();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn never_token_stays_live() {
        assert!(!CancellationToken::never().is_cancelled());
    }
}
