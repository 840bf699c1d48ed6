use crate::error::HandoffError;
use crate::loom::sync::{Condvar, Mutex, MutexGuard};
use crate::util::has_flag;

/// A receiver handle has been attached to the channel.
const ATTACHED: u8 = 1 << 0;
/// The result value has been written into the slot.
const FILLED: u8 = 1 << 1;
/// A terminal outcome (value or error) can be consumed.
const READY: u8 = 1 << 2;
/// Production is parked in the channel as a task, run on first access.
const DEFERRED: u8 = 1 << 3;
/// The receiver handle is gone without having consumed.
const DETACHED: u8 = 1 << 4;

type Task<T> = Box<dyn FnOnce() -> T + Send>;

struct Shared<T> {
  state: u8,
  value: Option<T>,
  task: Option<Task<T>>,
  /// The deferred task has been taken by the consumer and is running
  /// outside the lock. No producer write may succeed past this point.
  stolen: bool,
  error: Option<HandoffError>,
}

impl<T> Shared<T> {
  fn has_result(&self) -> bool {
    has_flag(self.state, FILLED) || self.error.is_some()
  }

  /// Whether the one producer write this channel allows is already spoken
  /// for, by a stored value, a captured error, or a parked task.
  fn write_claimed(&self) -> bool {
    self.has_result() || has_flag(self.state, DEFERRED) || self.stolen
  }

  /// First error wins; later captures are ignored.
  fn capture_error(&mut self, error: HandoffError) {
    if self.error.is_none() {
      self.error = Some(error);
    }
  }
}

/// Shared state of one promise/receiver pair.
///
/// The mutex guards the state bits and both payload slots; waking a blocked
/// consumer always happens with the lock held, so a consumer that observes
/// `READY` also observes a fully written value or error.
pub(crate) struct Channel<T> {
  shared: Mutex<Shared<T>>,
  readable: Condvar,
}

impl<T> Channel<T> {
  pub(crate) fn new() -> Self {
    Self {
      shared: Mutex::new(Shared {
        state: 0,
        value: None,
        task: None,
        stolen: false,
        error: None,
      }),
      readable: Condvar::new(),
    }
  }

  /// Claims the single receiver slot.
  pub(crate) fn attach(&self) -> Result<(), HandoffError> {
    let mut shared = self.shared.lock().unwrap();

    if has_flag(shared.state, ATTACHED) {
      return Err(HandoffError::AlreadyAttached);
    }
    shared.state |= ATTACHED;

    Ok(())
  }

  /// The receiver went away without consuming. A promise dropped after this
  /// point has no one left to notify.
  pub(crate) fn detach(&self) {
    let mut shared = self.shared.lock().unwrap();
    shared.state |= DETACHED;
  }

  /// The producer's terminal write. Exactly one call can succeed per
  /// channel.
  pub(crate) fn fulfill(&self, value: T) -> Result<(), HandoffError> {
    let mut shared = self.shared.lock().unwrap();

    if shared.write_claimed() {
      return Err(HandoffError::AlreadyFulfilled);
    }

    shared.value = Some(value);
    shared.state |= FILLED | READY;
    self.readable.notify_all();

    Ok(())
  }

  /// Parks `task` in the channel instead of a value; the first consumer
  /// access steals and runs it. Claims the write slot like `fulfill`.
  pub(crate) fn defer_with(&self, task: Task<T>) -> Result<(), HandoffError> {
    let mut shared = self.shared.lock().unwrap();

    if shared.write_claimed() {
      return Err(HandoffError::AlreadyFulfilled);
    }

    shared.task = Some(task);
    shared.state |= DEFERRED;

    Ok(())
  }

  /// Blocks until a terminal outcome exists, then consumes it. A captured
  /// error takes precedence over a stored value.
  pub(crate) fn take(&self) -> Result<T, HandoffError> {
    let shared = self.shared.lock().unwrap();
    let mut shared = self.wait_result(shared);

    if let Some(error) = shared.error {
      return Err(error);
    }

    Ok(shared.value.take().expect("ready channel holds neither value nor error"))
  }

  /// Non-blocking probe for a terminal outcome.
  pub(crate) fn is_ready(&self) -> bool {
    has_flag(self.shared.lock().unwrap().state, READY)
  }

  /// The promise is going away. If a receiver is still attached and nothing
  /// guarantees a terminal outcome, inject one so a blocked `take` always
  /// returns.
  pub(crate) fn abandon(&self) {
    let mut shared = self.shared.lock().unwrap();

    if shared.write_claimed() {
      return;
    }
    if !has_flag(shared.state, ATTACHED) || has_flag(shared.state, DETACHED) {
      return;
    }

    shared.capture_error(HandoffError::BrokenPromise);
    shared.state |= READY;
    self.readable.notify_all();
  }

  /// Waits with the lock held until `READY`, stealing a parked task if one
  /// is present. The steal path fully releases the lock around the task so
  /// the channel never blocks while computing.
  fn wait_result<'a>(
    &'a self,
    mut shared: MutexGuard<'a, Shared<T>>,
  ) -> MutexGuard<'a, Shared<T>> {
    loop {
      if has_flag(shared.state, READY) {
        return shared;
      }

      if has_flag(shared.state, DEFERRED) {
        shared.state &= !DEFERRED;
        shared.stolen = true;
        let task = shared.task.take().expect("deferred channel without a task");
        drop(shared);

        let value = task();

        shared = self.shared.lock().unwrap();
        shared.value = Some(value);
        shared.state |= FILLED | READY;
        self.readable.notify_all();
        return shared;
      }

      shared = self.readable.wait(shared).unwrap();
    }
  }
}
