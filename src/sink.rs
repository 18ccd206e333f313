//! Sink trait and implementations
//!
//! The Sink is the consumer half of the signal protocol. It receives exactly
//! one `on_subscribe`, then any number of `on_next` calls, then at most one
//! terminal signal (`on_error` xor `on_complete`). The terminal methods
//! consume `self`, so the type system enforces that nothing can be delivered
//! past a terminal signal.

use std::{
  convert::Infallible,
  sync::{Arc, Mutex},
};

use crate::subscription::{Subscription, UNBOUNDED};

/// The consumer of a stream of items.
///
/// Per subscription, signal delivery is totally ordered and non-reentrant: no
/// two signals are ever delivered concurrently to the same sink.
pub trait Sink<Item, Err = Infallible> {
  /// Receives the subscription controlling this binding.
  ///
  /// Called synchronously by `Source::subscribe`, before any other signal.
  /// The sink owns the subscription it receives; requesting demand from
  /// inside this callback is the normal way to start production.
  fn on_subscribe(&mut self, subscription: Arc<dyn Subscription>);

  /// Receives the next item.
  fn on_next(&mut self, item: Item);

  /// Receives the failure terminating this stream.
  fn on_error(self, err: Err);

  /// Receives the completion of this stream.
  fn on_complete(self);
}

/// Option sink - `None` drops all signals, `Some` delegates to the inner sink.
///
/// Terminal signals take the inner sink out, so anything arriving afterwards
/// is a no-op. `SharedSink` delegates through this impl, which is how the
/// delivery decorator drops late upstream activity without crashing.
impl<S, Item, Err> Sink<Item, Err> for Option<S>
where
  S: Sink<Item, Err>,
{
  fn on_subscribe(&mut self, subscription: Arc<dyn Subscription>) {
    if let Some(inner) = self {
      inner.on_subscribe(subscription);
    }
  }

  fn on_next(&mut self, item: Item) {
    if let Some(inner) = self {
      inner.on_next(item);
    }
  }

  fn on_error(self, err: Err) {
    if let Some(inner) = self {
      inner.on_error(err);
    }
  }

  fn on_complete(self) {
    if let Some(inner) = self {
      inner.on_complete();
    }
  }
}

/// Shared-slot sink used by stages that deliver from another thread.
///
/// Cloning shares the slot; terminal signals `take()` the inner sink so every
/// other clone observes the stream as finished.
pub(crate) type SharedSink<S> = Arc<Mutex<Option<S>>>;

impl<S, Item, Err> Sink<Item, Err> for SharedSink<S>
where
  S: Sink<Item, Err>,
{
  fn on_subscribe(&mut self, subscription: Arc<dyn Subscription>) {
    self.lock().unwrap().on_subscribe(subscription);
  }

  fn on_next(&mut self, item: Item) { self.lock().unwrap().on_next(item); }

  fn on_error(self, err: Err) {
    // Take the inner sink out before delivering, releasing the lock.
    let inner = self.lock().unwrap().take();
    inner.on_error(err);
  }

  fn on_complete(self) {
    let inner = self.lock().unwrap().take();
    inner.on_complete();
  }
}

/// Closure-backed terminal sink.
///
/// Requests unbounded demand as soon as it is subscribed and feeds every item
/// to the closure. This matches the terminal subscriber shape used throughout
/// the crate's tests: `subscription.request(UNBOUNDED)` on subscribe, observe
/// items, ignore completion.
///
/// ```
/// use backflow::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let record = seen.clone();
/// from_iter(1..=3).subscribe(FnSink::new(move |v| record.lock().unwrap().push(v)));
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
pub struct FnSink<F>(F);

impl<F> FnSink<F> {
  pub fn new(f: F) -> Self { FnSink(f) }
}

impl<F, Item> Sink<Item, Infallible> for FnSink<F>
where
  F: FnMut(Item),
{
  fn on_subscribe(&mut self, subscription: Arc<dyn Subscription>) {
    subscription.request(UNBOUNDED);
  }

  #[inline]
  fn on_next(&mut self, item: Item) { (self.0)(item); }

  fn on_error(self, _err: Infallible) {
    // Unreachable: the error type is uninhabited.
  }

  fn on_complete(self) {}
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::subscription::NoopSubscription;

  struct RecordingSink {
    values: Vec<i32>,
  }

  impl Sink<i32, ()> for RecordingSink {
    fn on_subscribe(&mut self, _subscription: Arc<dyn Subscription>) {}

    fn on_next(&mut self, item: i32) { self.values.push(item); }

    fn on_error(self, _err: ()) {}

    fn on_complete(self) {}
  }

  #[test]
  fn option_sink_drops_after_take() {
    let mut slot = Some(RecordingSink { values: vec![] });
    slot.on_next(1);
    slot.on_next(2);
    assert_eq!(slot.as_ref().unwrap().values, vec![1, 2]);

    let taken = slot.take().unwrap();
    taken.on_complete();
    // Late signals land on `None` and vanish.
    slot.on_next(3);
  }

  #[test]
  fn shared_sink_terminal_consumes_inner() {
    let slot: SharedSink<RecordingSink> =
      Arc::new(Mutex::new(Some(RecordingSink { values: vec![] })));
    let mut writer = slot.clone();
    writer.on_next(7);
    slot.clone().on_complete();
    assert!(slot.lock().unwrap().is_none());
    // Delivery after the terminal is a no-op, not a crash.
    writer.on_next(8);
  }

  #[test]
  fn fn_sink_feeds_closure() {
    let mut total = 0;
    let mut sink = FnSink::new(|v: i32| total += v);
    sink.on_subscribe(Arc::new(NoopSubscription));
    sink.on_next(10);
    sink.on_next(20);
    drop(sink);
    assert_eq!(total, 30);
  }
}
