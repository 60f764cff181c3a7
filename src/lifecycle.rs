//! Screen lifecycle as a stream.
//!
//! A screen publishes each [`LifecycleEvent`] into a replay-latest subject.
//! Other code binds work to that stream with a [`LifecycleTransformer`]: the
//! bound stream completes at a chosen later event.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::{
  error::ScreenError,
  observable::{Observable, Transformer},
  ops::{hide::Hide, take_until_event::TakeUntilEvent},
  subject::LocalBehaviorSubject,
};

/// Lifecycle callbacks of a screen, in the order a host delivers them:
/// `Create → [Start → Resume → Pause → Stop]* → Destroy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
  Create,
  Start,
  Resume,
  Pause,
  Stop,
  Destroy,
}

impl LifecycleEvent {
  /// The event that closes the span opened by `self`.
  ///
  /// Nothing follows `Destroy`, so it has no counterpart.
  pub fn corresponding(self) -> Result<LifecycleEvent, ScreenError> {
    match self {
      LifecycleEvent::Create => Ok(LifecycleEvent::Destroy),
      LifecycleEvent::Start => Ok(LifecycleEvent::Stop),
      LifecycleEvent::Resume => Ok(LifecycleEvent::Pause),
      LifecycleEvent::Pause => Ok(LifecycleEvent::Stop),
      LifecycleEvent::Stop => Ok(LifecycleEvent::Destroy),
      LifecycleEvent::Destroy => Err(ScreenError::OutsideLifecycle(self)),
    }
  }
}

/// Publishing side of a screen lifecycle.
pub type LifecycleSubject = LocalBehaviorSubject<LifecycleEvent, Infallible>;

/// Read-only lifecycle stream handed out to other code.
pub type LifecycleStream = Hide<LifecycleSubject>;

/// Which event ends a lifecycle-bound stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleScope {
  /// Ends at the next occurrence of this event.
  UntilEvent(LifecycleEvent),
  /// Ends at the counterpart of the event current at subscribe time.
  Corresponding,
}

/// Binds any stream to a lifecycle, see [`LifecycleProvider`].
#[derive(Clone)]
pub struct LifecycleTransformer {
  lifecycle: LifecycleStream,
  scope: LifecycleScope,
}

impl LifecycleTransformer {
  pub fn until_event(lifecycle: LifecycleStream, event: LifecycleEvent) -> Self {
    Self { lifecycle, scope: LifecycleScope::UntilEvent(event) }
  }

  pub fn corresponding(lifecycle: LifecycleStream) -> Self {
    Self { lifecycle, scope: LifecycleScope::Corresponding }
  }

  #[inline]
  pub fn scope(&self) -> LifecycleScope { self.scope }
}

impl<S> Transformer<S> for LifecycleTransformer
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
{
  type Output = TakeUntilEvent<S>;

  fn transform(self, source: S) -> TakeUntilEvent<S> {
    TakeUntilEvent { source, lifecycle: self.lifecycle, scope: self.scope }
  }
}

/// Anything exposing a lifecycle stream can scope work to it.
pub trait LifecycleProvider {
  /// The lifecycle events, replaying the latest one to new subscribers.
  fn lifecycle(&self) -> LifecycleStream;

  /// Completes a stream at the next `event`, or right away when `event` is
  /// the latest one already published.
  fn bind_until_event(&self, event: LifecycleEvent) -> LifecycleTransformer {
    LifecycleTransformer::until_event(self.lifecycle(), event)
  }

  /// Completes a stream at the event opposing the one current at subscribe
  /// time. A subscription made during `Create` ends at `Destroy`, one made
  /// during `Resume` ends at `Pause`.
  ///
  /// Subscribing after `Destroy` does not error: the bound stream completes
  /// at once without items, and [`ScreenError::OutsideLifecycle`] is only
  /// logged at `warn` level. Before any event, the first one published picks
  /// the end event.
  fn bind_to_lifecycle(&self) -> LifecycleTransformer {
    LifecycleTransformer::corresponding(self.lifecycle())
  }
}
