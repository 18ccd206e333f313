//! # backflow
//!
//! A minimal, from-scratch push-based stream core with explicit demand
//! signaling, cancellation, and two thread-relocation operators.
//!
//! ## Quick Start
//!
//! ```rust
//! use backflow::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let record = seen.clone();
//! from_iter(0..)
//!   .take(3)
//!   .subscribe(FnSink::new(move |v| record.lock().unwrap().push(v)));
//! assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
//! ```
//!
//! ## The protocol
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Source`] | Produces items to a sink under a demand/cancel contract |
//! | [`Sink`] | Receives `on_subscribe`, `on_next*`, then one terminal signal |
//! | [`Subscription`] | Carries `request` (demand) and `cancel` per binding |
//! | [`Worker`] | Single-thread FIFO context the relocation operators run on |
//!
//! A sink issues demand through the subscription it receives; the source
//! pushes signals downstream until completion, error, or cancellation. Per
//! subscription, signal delivery is totally ordered and exactly one terminal
//! signal (`on_error` xor `on_complete`) is delivered, at most once.
//!
//! ## Relocation operators
//!
//! [`SourceExt::subscribe_on`] moves the act of subscribing - and everything
//! the upstream triggers synchronously from it - onto a dedicated worker
//! thread. [`SourceExt::publish_on`] moves delivery of every signal onto a
//! dedicated worker thread, so a slow consumer no longer blocks the
//! producer. Both are transparent to signal content and order.
//!
//! ## Demand
//!
//! The built-in sources treat any request as unbounded: the first request
//! starts production, later requests are no-ops. Finite demand accounting is
//! deliberately out of scope.
//!
//! [`Source`]: source::Source
//! [`Sink`]: sink::Sink
//! [`Subscription`]: subscription::Subscription
//! [`Worker`]: worker::Worker
//! [`SourceExt::subscribe_on`]: ops::SourceExt::subscribe_on
//! [`SourceExt::publish_on`]: ops::SourceExt::publish_on

pub mod ops;
pub mod prelude;
pub mod sink;
pub mod source;
pub mod subscription;
pub mod worker;

pub use prelude::*;
