//! One-shot, single-producer/single-consumer value handoff.
//!
//! A [`Promise`] owns the producing half of a channel built for exactly one
//! transfer: the producing thread eventually supplies a value (or goes away
//! without one), and the [`Receiver`] blocks until that outcome exists, then
//! consumes it exactly once. Both halves are move-only and may be dropped
//! independently; the channel itself lives until the last half releases it.
//!
//! ```
//! use std::thread;
//!
//! use handoff::Promise;
//!
//! let promise = Promise::new();
//! let receiver = promise.receiver().unwrap();
//!
//! thread::spawn(move || {
//!   let _ = promise.fulfill(1 + 2);
//! });
//!
//! assert_eq!(receiver.recv(), Ok(3));
//! ```

#[doc(hidden)]
pub mod loom;

mod channel;
mod error;
mod promise;
mod util;

pub use error::HandoffError;
pub use promise::{Promise, Receiver};

#[doc(hidden)]
pub use handoff_macros::internal_test;
