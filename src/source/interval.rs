//! Periodic source driven by a dedicated timer thread.

use std::{
  convert::Infallible,
  panic::{catch_unwind, AssertUnwindSafe},
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
  },
  thread,
  time::Duration,
};

use tracing::error;

use crate::{
  sink::Sink,
  source::{LaunchGate, Source},
  subscription::Subscription,
  worker::panic_message,
};

static TIMER_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Creates a source emitting `0, 1, 2, ...` every `period` until cancelled.
///
/// The first `request` spawns a timer thread that sleeps one period, checks
/// the cancellation flag, and emits the next counter value. The source never
/// completes or errors on its own; termination is the downstream's business
/// (typically a `take` stage).
///
/// Cancellation is best-effort: the flag is checked between ticks, so at most
/// one more tick may already be in flight when `cancel` returns.
pub fn interval(period: Duration) -> Interval { Interval { period } }

#[derive(Clone)]
pub struct Interval {
  period: Duration,
}

impl Source for Interval {
  type Item = usize;
  type Err = Infallible;

  fn subscribe<S>(&self, mut sink: S)
  where
    S: Sink<usize, Infallible> + Send + 'static,
  {
    let subscription = Arc::new(TickSubscription {
      cancelled: Arc::new(AtomicBool::new(false)),
      gate: LaunchGate::new(),
      period: self.period,
    });
    sink.on_subscribe(subscription.clone() as Arc<dyn Subscription>);

    if let Some(sink) = subscription.gate.attach(sink) {
      spawn_timer(self.period, sink, subscription.cancelled.clone());
    }
  }
}

struct TickSubscription<S> {
  cancelled: Arc<AtomicBool>,
  gate: LaunchGate<S>,
  period: Duration,
}

impl<S> Subscription for TickSubscription<S>
where
  S: Sink<usize, Infallible> + Send + 'static,
{
  fn request(&self, _n: u64) {
    // Only the first request starts the timer; demand is unbounded.
    if let Some(sink) = self.gate.on_request() {
      spawn_timer(self.period, sink, self.cancelled.clone());
    }
  }

  fn cancel(&self) {
    self.cancelled.store(true, Ordering::Release);
    // Release a sink still parked behind the gate, or the subscription it
    // holds would keep this subscription (and the gate) alive in a cycle.
    self.gate.discard();
  }
}

fn spawn_timer<S>(period: Duration, mut sink: S, cancelled: Arc<AtomicBool>)
where
  S: Sink<usize, Infallible> + Send + 'static,
{
  if cancelled.load(Ordering::Acquire) {
    return;
  }
  let name = format!("interval-{}", TIMER_SEQ.fetch_add(1, Ordering::Relaxed));
  thread::Builder::new()
    .name(name)
    .spawn(move || {
      let mut counter = 0usize;
      loop {
        thread::sleep(period);
        if cancelled.load(Ordering::Acquire) {
          break;
        }
        let tick = catch_unwind(AssertUnwindSafe(|| sink.on_next(counter)));
        if let Err(payload) = tick {
          // A sink failure stops the tick loop and releases the timer.
          error!(
            panic = panic_message(payload.as_ref()),
            "interval sink panicked; stopping timer"
          );
          break;
        }
        counter += 1;
      }
    })
    .expect("failed to spawn interval timer thread");
}
