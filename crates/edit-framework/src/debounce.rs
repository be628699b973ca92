//! # Debounce
//!
//! A [`Debouncer`] turns a rapidly-changing input into a lagging output that only
//! moves once the input has been stable for a fixed delay.
//!
//! Both sides are `tokio::sync::watch` channels, so only the latest value is ever held;
//! intermediate keystrokes are overwritten, never queued. Every new input restarts the
//! timer. Dropping the `Debouncer` stops the background task without a late update.
//!
//! ```rust
//! use edit_framework::debounce::Debouncer;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let search = Debouncer::spawn(String::new(), Duration::from_millis(10));
//!     let mut settled = search.subscribe();
//!
//!     search.set("b".to_string());
//!     search.set("blue".to_string());
//!
//!     settled.changed().await.unwrap();
//!     assert_eq!(*settled.borrow(), "blue");
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::trace;

/// Debounced value of type `T`.
pub struct Debouncer<T> {
    input: watch::Sender<T>,
    output: Arc<watch::Sender<T>>,
    delay: Duration,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Starts the debounce task. Must be called from within a Tokio runtime.
    pub fn spawn(initial: T, delay: Duration) -> Self {
        let (input, input_rx) = watch::channel(initial.clone());
        let (output, _) = watch::channel(initial);
        let output = Arc::new(output);

        tokio::spawn(settle(input_rx, output.clone(), delay));

        Self {
            input,
            output,
            delay,
        }
    }

    /// Feeds a new input value; supersedes any pending update.
    pub fn set(&self, value: T) {
        self.input.send_replace(value);
    }

    /// Publishes `value` immediately, bypassing the delay.
    pub fn set_now(&self, value: T) {
        self.input.send_replace(value.clone());
        publish(&self.output, value);
    }

    /// The latest input, settled or not.
    pub fn latest(&self) -> T {
        self.input.borrow().clone()
    }

    /// The current settled value.
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    /// Receiver that is notified whenever the settled value changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

async fn settle<T>(mut input: watch::Receiver<T>, output: Arc<watch::Sender<T>>, delay: Duration)
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    while input.changed().await.is_ok() {
        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        // input side dropped mid-window: cancel
                        return;
                    }
                    trace!("Debounce timer restarted");
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }
        let latest = input.borrow_and_update().clone();
        publish(&output, latest);
    }
}

fn publish<T: PartialEq>(output: &watch::Sender<T>, value: T) {
    output.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}
