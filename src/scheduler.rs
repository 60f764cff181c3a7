//! Main-thread schedulers.
//!
//! A screen hands work back to its UI thread through a [`LocalScheduler`].
//! Production hosts drive a `futures` local executor from their loop, tests
//! either run a `LocalPool` or use [`Immediate`].

use std::rc::Rc;

/// A unit of work bound to the current thread.
pub type LocalTask = Box<dyn FnOnce()>;

/// Runs tasks on the thread that owns the scheduler.
pub trait LocalScheduler {
  fn schedule(&self, task: LocalTask);
}

/// Runs every task inline, at the moment it is scheduled.
#[derive(Clone, Copy, Debug, Default)]
pub struct Immediate;

impl LocalScheduler for Immediate {
  #[inline]
  fn schedule(&self, task: LocalTask) { task() }
}

impl<S: LocalScheduler + ?Sized> LocalScheduler for Rc<S> {
  #[inline]
  fn schedule(&self, task: LocalTask) { (**self).schedule(task) }
}

#[cfg(feature = "futures-scheduler")]
mod futures_scheduler {
  use futures::task::LocalSpawnExt;

  use super::{LocalScheduler, LocalTask};

  impl LocalScheduler for futures::executor::LocalSpawner {
    fn schedule(&self, task: LocalTask) {
      if let Err(err) = self.spawn_local(async move { task() }) {
        // Only happens once the owning pool is gone, nothing is left to run
        // the task on.
        tracing::warn!(%err, "main scheduler shut down, task dropped");
      }
    }
  }
}
