use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

enum Input<T> {
    Value(T),
    Flush,
    Cancel,
}

/// Restartable quiescence timer.
///
/// Every [`push`](Debouncer::push) replaces the pending value and restarts
/// the window; the value is emitted on the receiver once no new push has
/// arrived for a full window. Each debouncer owns its own timer task, which
/// is aborted when the debouncer is dropped. [`finish`](Debouncer::finish)
/// ends it gracefully instead.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<Input<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called inside a tokio runtime.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output, output_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_timer(window, input_rx, output));
        (
            Self {
                input,
                task: Some(task),
            },
            output_rx,
        )
    }

    pub fn push(&self, value: T) {
        self.send(Input::Value(value));
    }

    /// Emit the pending value now, if any.
    pub fn flush(&self) {
        self.send(Input::Flush);
    }

    /// Forget the pending value.
    pub fn cancel(&self) {
        self.send(Input::Cancel);
    }

    /// Emit the pending value, if any, then close the receiver.
    ///
    /// Draining the receiver until `None` sees every value exactly once.
    pub fn finish(mut self) {
        self.send(Input::Flush);
        // detach: the task exits on its own once the input side is gone
        self.task.take();
    }

    fn send(&self, input: Input<T>) {
        if self.input.send(input).is_err() {
            debug!(event = "core.filters.debounce_closed");
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_timer<T>(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<Input<T>>,
    output: mpsc::UnboundedSender<T>,
) {
    let mut pending: Option<T> = None;
    let timer = tokio::time::sleep(window);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            message = input.recv() => match message {
                Some(Input::Value(value)) => {
                    pending = Some(value);
                    timer.as_mut().reset(Instant::now() + window);
                }
                Some(Input::Flush) => {
                    if let Some(value) = pending.take()
                        && output.send(value).is_err()
                    {
                        break;
                    }
                }
                Some(Input::Cancel) => pending = None,
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    debug!(
                        event = "core.filters.debounce_fired",
                        window_ms = window.as_millis() as u64
                    );
                    if output.send(value).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_rapid_pushes_emit_once_with_last_value() {
        let (debouncer, mut rx) = Debouncer::new(WINDOW);
        let start = Instant::now();

        for text in ["c", "co", "con", "cont", "contr"] {
            debouncer.push(text.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(rx.recv().await.as_deref(), Some("contr"));
        // last push at 400ms, window restarts there
        assert!(start.elapsed() >= Duration::from_millis(900));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (debouncer, mut rx) = Debouncer::new(WINDOW);

        debouncer.push(1);
        assert_eq!(rx.recv().await, Some(1));

        debouncer.push(2);
        debouncer.push(3);
        assert_eq!(rx.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_emits_immediately() {
        let (debouncer, mut rx) = Debouncer::new(WINDOW);
        let start = Instant::now();

        debouncer.push("query");
        debouncer.flush();
        assert_eq!(rx.recv().await, Some("query"));
        assert!(start.elapsed() < WINDOW);

        tokio::time::sleep(WINDOW * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.push(7);
        debouncer.cancel();
        tokio::time::sleep(WINDOW * 3).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_timer() {
        let (debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.push(7);
        drop(debouncer);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_delivers_pending_value_then_closes() {
        let (debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.push("contrato".to_string());
        debouncer.finish();

        assert_eq!(rx.recv().await.as_deref(), Some("contrato"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_with_nothing_pending_just_closes() {
        let (debouncer, mut rx) = Debouncer::<u32>::new(WINDOW);
        debouncer.finish();
        assert_eq!(rx.recv().await, None);
    }
}
