//! Delivery context port

/// A unit of work to run on the delivery context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The execution context that callbacks are delivered on.
///
/// Implementations decide where a job runs; the executor only guarantees it
/// never invokes a callback directly from a transport task.
pub trait Dispatcher: Send + Sync {
    /// Schedules `job` to run on this context.
    fn dispatch(&self, job: Job);
}
