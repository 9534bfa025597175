use tokio::sync::watch;

/// Returns a handle/signal pair. Every clone of the signal resolves once the handle is dropped.
pub(crate) fn shutdown_signal() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(());

    (ShutdownHandle { _tx: tx }, ShutdownSignal { rx })
}

pub(crate) struct ShutdownHandle {
    _tx: watch::Sender<()>,
}

#[derive(Clone)]
pub(crate) struct ShutdownSignal {
    rx: watch::Receiver<()>,
}

impl ShutdownSignal {
    pub(crate) async fn wait(mut self) {
        // Nothing is ever sent, so `changed()` only returns once the sender is dropped.
        while self.rx.changed().await.is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn all_signals_resolve_on_handle_drop() {
        let (handle, signal) = shutdown_signal();
        let signal_clone = signal.clone();

        let first = tokio::spawn(signal.wait());
        let second = tokio::spawn(signal_clone.wait());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!first.is_finished());
        assert!(!second.is_finished());

        drop(handle);
        tokio::time::timeout(Duration::from_secs(5), first)
            .await
            .expect("Expected signal to resolve")
            .unwrap();
        tokio::time::timeout(Duration::from_secs(5), second)
            .await
            .expect("Expected signal to resolve")
            .unwrap();
    }
}
