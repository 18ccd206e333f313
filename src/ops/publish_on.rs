//! Signal-delivery relocation: deliver `on_next`/`on_error`/`on_complete` on
//! a dedicated worker thread, decoupling producer speed from consumer speed.

use std::sync::{Arc, Mutex};

use crate::{
  sink::{SharedSink, Sink},
  source::Source,
  subscription::Subscription,
  worker::Worker,
};

#[derive(Clone)]
pub struct PublishOnOp<S> {
  source: S,
}

impl<S> PublishOnOp<S> {
  pub(crate) fn new(source: S) -> Self { PublishOnOp { source } }
}

impl<S> Source for PublishOnOp<S>
where
  S: Source,
{
  type Item = S::Item;
  type Err = S::Err;

  fn subscribe<D>(&self, sink: D)
  where
    D: Sink<Self::Item, Self::Err> + Send + 'static,
  {
    self.source.subscribe(PublishOnSink {
      downstream: Arc::new(Mutex::new(Some(sink))),
      worker: Worker::spawn("publish-on"),
    });
  }
}

/// Intermediate sink owning the delivery worker.
///
/// `on_subscribe` is forwarded synchronously (unchanged thread); every other
/// signal becomes a task on the worker's FIFO queue, so the downstream sink
/// observes signals in exactly the upstream order, on the worker thread. The
/// terminal task shuts the worker down after delivering - the queue is empty
/// at that point, so nothing submitted before the terminal is lost, and any
/// upstream signal arriving later is dropped as a no-op.
struct PublishOnSink<D> {
  downstream: SharedSink<D>,
  worker: Worker,
}

impl<D, Item, Err> Sink<Item, Err> for PublishOnSink<D>
where
  D: Sink<Item, Err> + Send + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn on_subscribe(&mut self, subscription: Arc<dyn Subscription>) {
    self.downstream.on_subscribe(subscription);
  }

  fn on_next(&mut self, item: Item) {
    let mut downstream = self.downstream.clone();
    self.worker.submit(move || downstream.on_next(item));
  }

  fn on_error(self, err: Err) {
    let downstream = self.downstream.clone();
    let worker = self.worker.clone();
    self.worker.submit(move || {
      downstream.on_error(err);
      worker.shutdown();
    });
  }

  fn on_complete(self) {
    let downstream = self.downstream.clone();
    let worker = self.worker.clone();
    self.worker.submit(move || {
      downstream.on_complete();
      worker.shutdown();
    });
  }
}
