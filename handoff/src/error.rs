use thiserror::Error;

/// Everything that can go wrong on either half of a handoff channel.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
  #[error("a receiver is already attached to this channel")]
  AlreadyAttached,

  #[error("a result has already been set on this channel")]
  AlreadyFulfilled,

  #[error("promise is not associated with a channel")]
  NoChannel,

  #[error("promise was dropped before a result was set")]
  BrokenPromise,
}
