//! Fluent composition surface for sources.

use crate::source::Source;

pub mod publish_on;
pub mod subscribe_on;
pub mod take;

pub use publish_on::PublishOnOp;
pub use subscribe_on::SubscribeOnOp;
pub use take::TakeOp;

/// Chaining methods available on every source.
pub trait SourceExt: Source + Sized {
  /// Forwards at most `count` items, then cancels upstream and completes.
  ///
  /// A `count` of zero completes immediately on subscribe, forwarding
  /// nothing.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Relocates the upstream subscribe call (and the production it triggers
  /// synchronously) onto a dedicated worker thread.
  fn subscribe_on(self) -> SubscribeOnOp<Self> { SubscribeOnOp::new(self) }

  /// Relocates delivery of `on_next`/`on_error`/`on_complete` onto a
  /// dedicated worker thread, preserving signal order.
  fn publish_on(self) -> PublishOnOp<Self> { PublishOnOp::new(self) }
}

impl<S: Source> SourceExt for S {}
