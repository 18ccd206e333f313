//! The demand/cancellation half of the signal protocol.
//!
//! A [`Subscription`] is the control channel a source hands to its sink via
//! `on_subscribe`. The sink side calls [`request`](Subscription::request) to
//! grant demand and [`cancel`](Subscription::cancel) to stop production. Both
//! calls return promptly; neither ever blocks on an in-flight signal.

use std::sync::Arc;

/// Demand value treated as "no limit".
///
/// Terminal sinks in this crate always request unbounded demand; sources treat
/// any granted demand as unbounded (see the crate-level notes on demand
/// tracking).
pub const UNBOUNDED: u64 = u64::MAX;

/// One active source→sink binding.
///
/// A `Subscription` is created per `subscribe` call and is dead once a
/// terminal signal fires or cancellation takes effect. It is handed to the
/// sink as an `Arc<dyn Subscription>` so intermediate stages can retain a
/// handle for early cancellation while still forwarding it downstream.
pub trait Subscription: Send + Sync {
  /// Grants `n` additional items of demand.
  ///
  /// `n` must be positive. The sources in this crate treat any request as
  /// unbounded: the first request starts production and later requests are
  /// no-ops.
  fn request(&self, n: u64);

  /// Signals the source to stop producing.
  ///
  /// Idempotent; safe to call after completion. Cancellation is best-effort
  /// and asynchronous: a signal already in flight may still be delivered
  /// (the periodic source checks its flag between ticks, so at most one more
  /// tick can arrive after `cancel` returns).
  fn cancel(&self);
}

impl<T: Subscription + ?Sized> Subscription for Arc<T> {
  #[inline]
  fn request(&self, n: u64) { (**self).request(n) }

  #[inline]
  fn cancel(&self) { (**self).cancel() }
}

/// A subscription with no production to control. Useful for sinks of sources
/// that emit eagerly, and for tests.
pub struct NoopSubscription;

impl Subscription for NoopSubscription {
  fn request(&self, _n: u64) {}

  fn cancel(&self) {}
}
