#![allow(unused_imports)]

pub(crate) mod sync {
  #[cfg(loom)]
  pub use loom::sync::{Arc, Condvar, Mutex, MutexGuard};
  #[cfg(not(loom))]
  pub use std::sync::{Arc, Condvar, Mutex, MutexGuard};
}

#[cfg(loom)]
pub use loom::thread;

#[cfg(not(loom))]
pub use std::thread;

/// Runs `f` under the loom permutation explorer when built with
/// `--cfg loom`, and directly otherwise.
pub fn model<F>(f: F)
where
  F: Fn() + Sync + Send + 'static,
{
  #[cfg(loom)]
  loom::model(f);

  #[cfg(not(loom))]
  f();
}
