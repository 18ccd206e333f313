//! Single-thread FIFO worker owned by the relocation decorators.

use std::{
  any::Any,
  panic::{catch_unwind, AssertUnwindSafe},
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    mpsc::{channel, Receiver, Sender},
    Arc, Mutex,
  },
  thread,
};

use tracing::{error, trace};

type Task = Box<dyn FnOnce() + Send>;

static WORKER_SEQ: AtomicUsize = AtomicUsize::new(0);

/// An owned single-thread execution context with a FIFO task queue.
///
/// Tasks submitted to a worker run strictly in submission order, one at a
/// time, on one dedicated OS thread. Each relocation decorator owns exactly
/// one worker per subscription; workers are never shared across
/// subscriptions.
///
/// Lifetime: [`shutdown`](Worker::shutdown) closes the intake and discards
/// queued-but-unrun tasks. Dropping every handle instead closes the intake
/// gracefully - the thread drains what was already queued and exits. The
/// subscription-time decorator relies on the drop path, the signal-delivery
/// decorator on explicit shutdown from its terminal task.
#[derive(Clone)]
pub struct Worker {
  inner: Arc<WorkerInner>,
}

struct WorkerInner {
  tx: Mutex<Option<Sender<Task>>>,
  // Shared with the loop thread on its own. The loop must not hold
  // `WorkerInner`: the `Sender` in `tx` would then outlive every handle and
  // the channel would never disconnect on the drop path.
  shut: Arc<AtomicBool>,
  name: String,
}

impl Worker {
  /// Spawns a dedicated worker thread named `<prefix>-<seq>`.
  pub fn spawn(prefix: &str) -> Self {
    let (tx, rx) = channel::<Task>();
    let name = format!("{prefix}-{}", WORKER_SEQ.fetch_add(1, Ordering::Relaxed));
    let shut = Arc::new(AtomicBool::new(false));

    let loop_name = name.clone();
    let loop_shut = shut.clone();
    thread::Builder::new()
      .name(name.clone())
      .spawn(move || run_loop(rx, loop_shut, loop_name))
      .expect("failed to spawn worker thread");

    Worker {
      inner: Arc::new(WorkerInner { tx: Mutex::new(Some(tx)), shut, name }),
    }
  }

  /// Submits a task to the back of the queue.
  ///
  /// After shutdown the task is silently dropped; no error is raised back to
  /// the producer.
  pub fn submit<F>(&self, task: F)
  where
    F: FnOnce() + Send + 'static,
  {
    match self.inner.tx.lock().unwrap().as_ref() {
      // SendError means the loop already exited; the task is dropped.
      Some(tx) => {
        let _ = tx.send(Box::new(task));
      }
      None => {
        trace!(worker = %self.inner.name, "task dropped: worker is shut down");
      }
    }
  }

  /// Shuts the worker down: no new tasks are accepted and queued-but-unrun
  /// tasks are discarded. Idempotent.
  pub fn shutdown(&self) {
    self.inner.shut.store(true, Ordering::Release);
    self.inner.tx.lock().unwrap().take();
  }
}

fn run_loop(rx: Receiver<Task>, shut: Arc<AtomicBool>, name: String) {
  while let Ok(task) = rx.recv() {
    if shut.load(Ordering::Acquire) {
      // Discard this and everything still queued.
      break;
    }
    if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
      // A panicking callback must not take the queue down with it.
      error!(
        worker = %name,
        panic = panic_message(payload.as_ref()),
        "task panicked; worker continues"
      );
    }
  }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
  payload
    .downcast_ref::<&str>()
    .copied()
    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
    .unwrap_or("opaque panic payload")
}

#[cfg(test)]
mod test {
  use super::*;
  use std::{sync::mpsc, time::Duration};

  #[test]
  fn tasks_run_in_submission_order() {
    let worker = Worker::spawn("fifo");
    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..100 {
      let order = order.clone();
      worker.submit(move || order.lock().unwrap().push(i));
    }
    let (done_tx, done_rx) = mpsc::channel();
    worker.submit(move || done_tx.send(()).unwrap());
    done_rx.recv_timeout(Duration::from_secs(1)).unwrap();

    assert_eq!(*order.lock().unwrap(), (0..100).collect::<Vec<_>>());
  }

  #[test]
  fn panicking_task_does_not_kill_the_loop() {
    let worker = Worker::spawn("panicky");
    worker.submit(|| panic!("boom"));
    let (done_tx, done_rx) = mpsc::channel();
    worker.submit(move || done_tx.send("survived").unwrap());

    assert_eq!(done_rx.recv_timeout(Duration::from_secs(1)), Ok("survived"));
  }

  #[test]
  fn shutdown_discards_queued_tasks() {
    let worker = Worker::spawn("discarding");
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let ran = Arc::new(AtomicBool::new(false));

    // First task blocks the loop so the second stays queued.
    worker.submit(move || {
      let _ = gate_rx.recv();
    });
    let queued_ran = ran.clone();
    worker.submit(move || queued_ran.store(true, Ordering::SeqCst));

    worker.shutdown();
    gate_tx.send(()).unwrap();
    thread::sleep(Duration::from_millis(50));

    assert!(!ran.load(Ordering::SeqCst));
  }

  #[test]
  fn submit_after_shutdown_is_dropped() {
    let worker = Worker::spawn("closed");
    worker.shutdown();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = ran.clone();
    worker.submit(move || flag.store(true, Ordering::SeqCst));
    thread::sleep(Duration::from_millis(20));

    assert!(!ran.load(Ordering::SeqCst));
  }

  #[test]
  fn shutdown_is_idempotent() {
    let worker = Worker::spawn("twice");
    worker.shutdown();
    worker.shutdown();
  }
}
