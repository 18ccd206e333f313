//! Source backed by an iterator, emitting on the requesting thread.

use std::{
  convert::Infallible,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use crate::{
  sink::Sink,
  source::{LaunchGate, Source},
  subscription::Subscription,
};

/// Creates a source that emits every item of `iter`, then completes.
///
/// Emission is synchronous on the thread that grants the first demand (demand
/// issued from inside `on_subscribe` starts emission right after `subscribe`
/// returns, on the subscriber's thread). The cancellation flag is checked
/// between items, so an infinite iterator combined with a cancelling stage
/// such as `take` is fine.
///
/// ```
/// use backflow::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let record = seen.clone();
/// from_iter(0..).take(3).subscribe(FnSink::new(move |v| record.lock().unwrap().push(v)));
/// assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
/// ```
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator + Clone,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<I>(I);

impl<I> Source for FromIter<I>
where
  I: IntoIterator + Clone,
  I::Item: Send + 'static,
  I::IntoIter: Send + 'static,
{
  type Item = I::Item;
  type Err = Infallible;

  fn subscribe<S>(&self, mut sink: S)
  where
    S: Sink<Self::Item, Self::Err> + Send + 'static,
  {
    let subscription = Arc::new(IterSubscription {
      cancelled: AtomicBool::new(false),
      gate: LaunchGate::new(),
    });
    sink.on_subscribe(subscription.clone() as Arc<dyn Subscription>);

    let iter = self.0.clone().into_iter();
    if let Some((iter, sink)) = subscription.gate.attach((iter, sink)) {
      drain(iter, sink, &subscription.cancelled);
    }
  }
}

struct IterSubscription<T> {
  cancelled: AtomicBool,
  gate: LaunchGate<T>,
}

impl<It, S> Subscription for IterSubscription<(It, S)>
where
  It: Iterator + Send + 'static,
  S: Sink<It::Item, Infallible> + Send + 'static,
{
  fn request(&self, _n: u64) {
    if let Some((iter, sink)) = self.gate.on_request() {
      drain(iter, sink, &self.cancelled);
    }
  }

  fn cancel(&self) {
    self.cancelled.store(true, Ordering::Release);
    // Release a sink still parked behind the gate, or the subscription it
    // holds would keep this subscription (and the gate) alive in a cycle.
    self.gate.discard();
  }
}

fn drain<It, S>(iter: It, mut sink: S, cancelled: &AtomicBool)
where
  It: Iterator,
  S: Sink<It::Item, Infallible>,
{
  for item in iter {
    if cancelled.load(Ordering::Acquire) {
      return;
    }
    sink.on_next(item);
  }
  if !cancelled.load(Ordering::Acquire) {
    sink.on_complete();
  }
}
