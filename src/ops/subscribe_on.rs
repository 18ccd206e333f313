//! Subscription-time relocation: run the upstream subscribe call, and
//! everything it triggers synchronously, on a dedicated worker thread.

use crate::{sink::Sink, source::Source, worker::Worker};

#[derive(Clone)]
pub struct SubscribeOnOp<S> {
  source: S,
}

impl<S> SubscribeOnOp<S> {
  pub(crate) fn new(source: S) -> Self { SubscribeOnOp { source } }
}

impl<S> Source for SubscribeOnOp<S>
where
  S: Source + Clone + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  /// Returns without blocking. `on_subscribe`, demand issued by the sink,
  /// and the upstream's synchronously-triggered production all run on the
  /// worker thread.
  ///
  /// The worker handle is dropped right after the single submission, so the
  /// worker thread exits once that task has run. Production that the task
  /// merely started (a timer thread, a delivery worker) outlives it; tearing
  /// that down remains the subscription's cancellation path, not this
  /// decorator's.
  fn subscribe<D>(&self, sink: D)
  where
    D: Sink<Self::Item, Self::Err> + Send + 'static,
  {
    let source = self.source.clone();
    let worker = Worker::spawn("subscribe-on");
    worker.submit(move || source.subscribe(sink));
  }
}
