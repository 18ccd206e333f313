//! Source trait and the demand launch gate shared by the built-in sources.

use std::sync::Mutex;

use crate::sink::Sink;

pub mod from_iter;
pub mod interval;

pub use from_iter::{from_iter, FromIter};
pub use interval::{interval, Interval};

/// The producer of a stream of items.
///
/// A source is stateless and reusable: every `subscribe` call establishes an
/// independent subscription. `subscribe` hands the sink its subscription
/// synchronously, before any other signal.
pub trait Source {
  type Item: Send + 'static;
  type Err: Send + 'static;

  fn subscribe<S>(&self, sink: S)
  where
    S: Sink<Self::Item, Self::Err> + Send + 'static;
}

/// One-shot gate between `on_subscribe` and the first `request`.
///
/// Sources deliver `on_subscribe` before the sink is attached to their
/// subscription, so a `request` issued from inside that callback cannot start
/// production re-entrantly. The gate records such early demand and releases
/// the sink to the production path exactly once, either when the sink is
/// attached or when demand arrives later - whichever comes second.
pub(crate) struct LaunchGate<S>(Mutex<LaunchState<S>>);

enum LaunchState<S> {
  /// Neither demand nor sink yet.
  Idle,
  /// Demand arrived while `on_subscribe` was still running.
  Requested,
  /// Sink attached, waiting for demand.
  Armed(S),
  /// Production has started; later demand is a no-op.
  Launched,
}

impl<S> LaunchGate<S> {
  pub(crate) fn new() -> Self { LaunchGate(Mutex::new(LaunchState::Idle)) }

  /// Records demand. Returns the sink iff this request starts production.
  pub(crate) fn on_request(&self) -> Option<S> {
    let mut state = self.0.lock().unwrap();
    match std::mem::replace(&mut *state, LaunchState::Launched) {
      LaunchState::Armed(sink) => Some(sink),
      LaunchState::Idle => {
        *state = LaunchState::Requested;
        None
      }
      LaunchState::Requested => {
        *state = LaunchState::Requested;
        None
      }
      LaunchState::Launched => None,
    }
  }

  /// Attaches the sink once `on_subscribe` has returned. Returns it back iff
  /// demand already arrived, in which case the caller starts production.
  /// A sink attached to an already-closed gate is dropped.
  pub(crate) fn attach(&self, sink: S) -> Option<S> {
    let mut state = self.0.lock().unwrap();
    match std::mem::replace(&mut *state, LaunchState::Launched) {
      LaunchState::Requested => Some(sink),
      LaunchState::Launched => None,
      _ => {
        *state = LaunchState::Armed(sink);
        None
      }
    }
  }

  /// Closes the gate and drops a parked sink.
  ///
  /// `cancel` calls this so a sink that never requested is released instead
  /// of staying armed forever. A sink commonly stores the subscription it
  /// received, and the subscription owns this gate, so a parked sink would
  /// otherwise keep the whole cycle alive.
  pub(crate) fn discard(&self) {
    *self.0.lock().unwrap() = LaunchState::Launched;
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn demand_before_attach_launches_on_attach() {
    let gate = LaunchGate::new();
    assert!(gate.on_request().is_none());
    assert_eq!(gate.attach("sink"), Some("sink"));
    // Production started exactly once.
    assert!(gate.on_request().is_none());
  }

  #[test]
  fn attach_before_demand_launches_on_request() {
    let gate = LaunchGate::new();
    assert!(gate.attach("sink").is_none());
    assert_eq!(gate.on_request(), Some("sink"));
    assert!(gate.on_request().is_none());
  }

  #[test]
  fn repeated_demand_is_recorded_once() {
    let gate = LaunchGate::new();
    assert!(gate.on_request().is_none());
    assert!(gate.on_request().is_none());
    assert_eq!(gate.attach(1), Some(1));
  }

  #[test]
  fn discard_drops_the_parked_sink() {
    let sink = std::sync::Arc::new(());
    let gate = LaunchGate::new();
    assert!(gate.attach(sink.clone()).is_none());

    gate.discard();
    assert_eq!(std::sync::Arc::strong_count(&sink), 1, "parked sink not released");
    assert!(gate.on_request().is_none());
  }

  #[test]
  fn discard_before_attach_drops_the_sink_on_attach() {
    let sink = std::sync::Arc::new(());
    let gate = LaunchGate::new();
    gate.discard();

    assert!(gate.attach(sink.clone()).is_none());
    assert_eq!(std::sync::Arc::strong_count(&sink), 1);
    assert!(gate.on_request().is_none());
  }
}
