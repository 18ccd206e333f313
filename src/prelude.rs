//! Convenient imports for the common case.

pub use crate::ops::{PublishOnOp, SourceExt, SubscribeOnOp, TakeOp};
pub use crate::sink::{FnSink, Sink};
pub use crate::source::{from_iter, interval, FromIter, Interval, Source};
pub use crate::subscription::{NoopSubscription, Subscription, UNBOUNDED};
pub use crate::worker::Worker;
