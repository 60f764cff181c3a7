use thiserror::Error;

use crate::{lifecycle::LifecycleEvent, presenter::PresenterId};

/// Errors raised by the screen layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
  /// A lifecycle-scoped binding was requested when no later event can end
  /// it.
  #[error("cannot bind to the screen lifecycle after {0:?}")]
  OutsideLifecycle(LifecycleEvent),

  /// The retention registry holds the saved presenter id under another type.
  #[error("presenter {id} is retained with a type other than `{expected}`")]
  PresenterTypeMismatch { id: PresenterId, expected: &'static str },

  /// The host is already borrowed, so it cannot take a navigation call.
  #[error("host is busy and cannot handle navigation right now")]
  HostBusy,

  #[error("navigation failed: {0}")]
  Navigation(String),
}
