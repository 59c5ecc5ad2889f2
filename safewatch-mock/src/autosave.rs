use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delays a value and forwards only the latest one scheduled.
///
/// Scheduling while a value is still pending aborts the pending timer.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::Sender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::Sender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(value).await.is_err() {
                tracing::warn!("autosave receiver dropped");
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_latest_value_wins() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut debouncer = Debouncer::new(Duration::from_millis(800), tx);

        debouncer.schedule(1);
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.schedule(2);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(rx.recv().await, Some(2));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut debouncer = Debouncer::new(Duration::from_millis(800), tx);

        debouncer.schedule("draft");
        assert!(debouncer.is_pending());
        debouncer.cancel();
        drop(debouncer);

        assert_eq!(rx.recv().await, None);
    }
}
