//! Delivery contexts.
//!
//! [`EventLoop`] is a single-threaded job queue owned by the caller: jobs
//! posted through any [`EventLoopHandle`] run in FIFO order on whichever
//! thread drives the loop. [`InlineDispatcher`] runs jobs immediately on
//! the posting thread.

use tokio::sync::mpsc;

use crate::ports::{Dispatcher, Job};

enum Message {
    Run(Job),
    Quit,
}

/// A caller-owned job queue that acts as the designated delivery context.
///
/// # Example
///
/// ```ignore
/// let (event_loop, handle) = EventLoop::new();
/// let executor = RequestExecutor::new(transport, Arc::new(handle.clone()))?;
/// // ... execute requests, then on the thread that owns caller state:
/// event_loop.run();
/// ```
pub struct EventLoop {
    receiver: mpsc::UnboundedReceiver<Message>,
}

/// Posts jobs onto an [`EventLoop`].
#[derive(Clone)]
pub struct EventLoopHandle {
    sender: mpsc::UnboundedSender<Message>,
}

impl EventLoop {
    /// Creates a loop and a handle for posting to it.
    #[must_use]
    pub fn new() -> (Self, EventLoopHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { receiver }, EventLoopHandle { sender })
    }

    /// Runs jobs on the current thread until [`EventLoopHandle::quit`] is
    /// called or every handle is dropped.
    ///
    /// Blocks the thread. Must not be called from within an async context;
    /// use [`EventLoop::run_async`] there.
    pub fn run(mut self) {
        while let Some(message) = self.receiver.blocking_recv() {
            match message {
                Message::Run(job) => job(),
                Message::Quit => break,
            }
        }
        tracing::debug!("event loop stopped");
    }

    /// Runs jobs on the current task until [`EventLoopHandle::quit`] is
    /// called or every handle is dropped.
    pub async fn run_async(mut self) {
        while let Some(message) = self.receiver.recv().await {
            match message {
                Message::Run(job) => job(),
                Message::Quit => break,
            }
        }
        tracing::debug!("event loop stopped");
    }

    /// Runs every job that is already queued, then returns how many ran.
    ///
    /// Stops early at a quit request, leaving later jobs queued.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                Message::Run(job) => {
                    job();
                    ran += 1;
                }
                Message::Quit => break,
            }
        }
        ran
    }
}

impl EventLoopHandle {
    /// Asks the loop to stop after the jobs queued before this call.
    pub fn quit(&self) {
        if self.sender.send(Message::Quit).is_err() {
            tracing::debug!("event loop already stopped");
        }
    }

    /// Returns true if the loop has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Dispatcher for EventLoopHandle {
    fn dispatch(&self, job: Job) {
        if self.sender.send(Message::Run(job)).is_err() {
            tracing::warn!("event loop is gone, dropping callback");
        }
    }
}

/// Runs jobs immediately on the thread that posts them.
///
/// Suitable when the caller already runs on its designated context, and in
/// tests that want outcomes delivered synchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, job: Job) {
        job();
    }
}
