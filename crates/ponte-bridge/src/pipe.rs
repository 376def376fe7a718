//! Shared background pipe for decode work.
//!
//! One worker thread drains a FIFO job queue, so tasks submitted through the
//! same pipe never run in parallel with each other and never touch the
//! thread that submitted them. The real-time path only ever enqueues.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send>;

/// Decode pipe configuration.
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Name given to the worker thread.
    pub thread_name: String,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            thread_name: "ponte-dataref-decode".into(),
        }
    }
}

/// Handle to one submitted job.
///
/// Completion is signalled through a dedicated channel; a job that panics
/// still resolves the handle when its sender is dropped, so waiters can
/// never hang on an abandoned task.
pub struct TaskHandle {
    done: Receiver<()>,
}

impl TaskHandle {
    /// Non-blocking completion check.
    pub fn is_complete(&self) -> bool {
        match self.done.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        }
    }

    /// Block until the job has finished running.
    pub fn wait(&self) {
        // Ok = completed normally, Err = worker gone; either way it no
        // longer references any captured state.
        let _ = self.done.recv();
    }
}

/// Ordered background task queue with a single worker thread.
pub struct DecodePipe {
    job_tx: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl DecodePipe {
    pub fn new() -> Self {
        Self::with_config(PipeConfig::default())
    }

    pub fn with_config(config: PipeConfig) -> Self {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();

        let worker = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    job();
                }
            })
            .expect("failed to spawn decode pipe thread");

        Self {
            job_tx: Some(job_tx),
            worker: Some(worker),
        }
    }

    /// Enqueue `job` behind everything already queued.
    pub fn spawn(&self, job: impl FnOnce() + Send + 'static) -> TaskHandle {
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let wrapped = Box::new(move || {
            job();
            let _ = done_tx.send(());
        });
        let sent = self
            .job_tx
            .as_ref()
            .map(|tx| tx.send(wrapped).is_ok())
            .unwrap_or(false);
        if !sent {
            tracing::error!("decode pipe worker is gone; dropping job");
        }
        TaskHandle { done: done_rx }
    }
}

impl Default for DecodePipe {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DecodePipe {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain remaining jobs and exit.
        self.job_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
