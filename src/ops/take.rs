//! Limiting transform: forward at most `count` items, then cancel upstream
//! and complete downstream.

use std::sync::Arc;

use tracing::trace;

use crate::{sink::Sink, source::Source, subscription::Subscription};

#[derive(Clone)]
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { TakeOp { source, count } }
}

impl<S> Source for TakeOp<S>
where
  S: Source,
{
  type Item = S::Item;
  type Err = S::Err;

  fn subscribe<D>(&self, sink: D)
  where
    D: Sink<Self::Item, Self::Err> + Send + 'static,
  {
    self.source.subscribe(TakeSink {
      downstream: Some(sink),
      upstream: None,
      count: self.count,
      seen: 0,
    });
  }
}

struct TakeSink<D> {
  downstream: Option<D>,
  upstream: Option<Arc<dyn Subscription>>,
  count: usize,
  seen: usize,
}

impl<D, Item, Err> Sink<Item, Err> for TakeSink<D>
where
  D: Sink<Item, Err>,
{
  fn on_subscribe(&mut self, subscription: Arc<dyn Subscription>) {
    self.upstream = Some(subscription.clone());
    if let Some(downstream) = self.downstream.as_mut() {
      downstream.on_subscribe(subscription);
    }
    // A bound of zero completes during subscribe, before any item can flow.
    if self.count == 0 {
      if let Some(upstream) = self.upstream.take() {
        upstream.cancel();
      }
      if let Some(downstream) = self.downstream.take() {
        downstream.on_complete();
      }
    }
  }

  fn on_next(&mut self, item: Item) {
    let Some(downstream) = self.downstream.as_mut() else {
      trace!("item dropped: bound already reached");
      return;
    };
    downstream.on_next(item);
    self.seen += 1;
    if self.seen >= self.count {
      // Cancel upstream exactly once, then complete downstream.
      if let Some(upstream) = self.upstream.take() {
        upstream.cancel();
      }
      if let Some(downstream) = self.downstream.take() {
        downstream.on_complete();
      }
    }
  }

  fn on_error(mut self, err: Err) {
    if let Some(downstream) = self.downstream.take() {
      downstream.on_error(err);
    }
  }

  fn on_complete(mut self) {
    if let Some(downstream) = self.downstream.take() {
      downstream.on_complete();
    }
  }
}
