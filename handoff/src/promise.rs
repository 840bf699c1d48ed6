use crate::channel::Channel;
use crate::error::HandoffError;
use crate::loom::sync::Arc;

/// Producing half of a one-shot handoff.
///
/// A promise owns a freshly allocated channel, hands out at most one
/// [`Receiver`] for it, and resolves it at most once, either immediately
/// with [`fulfill`](Promise::fulfill) or lazily with
/// [`defer`](Promise::defer). Dropping an unresolved promise while a
/// receiver is attached resolves the channel with
/// [`HandoffError::BrokenPromise`] instead of leaving the receiver blocked.
///
/// # Example
///
/// ```rust
/// use handoff::Promise;
///
/// let promise = Promise::new();
/// let receiver = promise.receiver().unwrap();
///
/// promise.fulfill(42).unwrap();
///
/// assert_eq!(receiver.recv(), Ok(42));
/// ```
pub struct Promise<T> {
  channel: Option<Arc<Channel<T>>>,
}

impl<T> Promise<T> {
  pub fn new() -> Self {
    Self { channel: Some(Arc::new(Channel::new())) }
  }

  fn channel(&self) -> Result<&Arc<Channel<T>>, HandoffError> {
    self.channel.as_ref().ok_or(HandoffError::NoChannel)
  }

  /// Returns the consuming half of this channel.
  ///
  /// Only one receiver can ever exist per channel; a second call fails with
  /// [`HandoffError::AlreadyAttached`].
  pub fn receiver(&self) -> Result<Receiver<T>, HandoffError> {
    let channel = self.channel()?;
    channel.attach()?;

    Ok(Receiver { channel: Some(channel.clone()) })
  }

  /// Resolves the channel with `value`, waking a blocked receiver.
  ///
  /// Fails with [`HandoffError::AlreadyFulfilled`] if the channel already
  /// carries a value, an error, or a deferred task; the earlier resolution
  /// is unaffected.
  pub fn fulfill(&self, value: T) -> Result<(), HandoffError> {
    self.channel()?.fulfill(value)
  }

  /// Parks `task` in the channel; the receiver runs it on its own thread
  /// the first time it asks for the result.
  ///
  /// A deferred promise may be dropped freely: the parked task still
  /// guarantees a terminal outcome, so no broken-promise error is injected.
  pub fn defer<F>(&self, task: F) -> Result<(), HandoffError>
  where
    F: FnOnce() -> T + Send + 'static,
  {
    self.channel()?.defer_with(Box::new(task))
  }
}

impl<T> Default for Promise<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Drop for Promise<T> {
  fn drop(&mut self) {
    if let Some(channel) = self.channel.take() {
      channel.abandon();
    }
  }
}

/// Consuming half of a one-shot handoff.
///
/// Constructed only through [`Promise::receiver`]. The single
/// [`recv`](Receiver::recv) call consumes the handle, so the result can be
/// taken at most once by construction.
pub struct Receiver<T> {
  channel: Option<Arc<Channel<T>>>,
}

impl<T> Receiver<T> {
  /// Whether a terminal outcome is already waiting, without blocking.
  pub fn is_ready(&self) -> bool {
    match &self.channel {
      Some(channel) => channel.is_ready(),
      None => false,
    }
  }

  /// Blocks until the promise side produces a terminal outcome, then
  /// consumes it.
  ///
  /// Returns the fulfilled value, or [`HandoffError::BrokenPromise`] if the
  /// promise was dropped without resolving the channel. The receiver's hold
  /// on the channel is released on every exit path.
  pub fn recv(mut self) -> Result<T, HandoffError> {
    let channel = self.channel.take().ok_or(HandoffError::NoChannel)?;
    channel.take()
  }
}

impl<T> Drop for Receiver<T> {
  fn drop(&mut self) {
    if let Some(channel) = self.channel.take() {
      channel.detach();
    }
  }
}

#[cfg(test)]
static_assertions::assert_impl_all!(Promise<()>: Send, Sync);
#[cfg(test)]
static_assertions::assert_impl_all!(Receiver<()>: Send, Sync);
