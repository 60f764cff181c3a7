//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  activity_result::{ActivityResult, ActivityResultBuilder, RESULT_CANCELED, RESULT_FIRST_USER, RESULT_OK},
  bundle::{maybe_bundle, Bundle, BundleValue, Intent},
  error::ScreenError,
  lifecycle::{
    LifecycleEvent, LifecycleProvider, LifecycleScope, LifecycleStream, LifecycleSubject,
    LifecycleTransformer,
  },
  observable,
  observable::{Observable, ObservableExt, Transformer},
  observer::{BoxedObserver, DynObserver, Observer},
  presenter::{
    Presenter, PresenterDescriptor, PresenterId, PresenterManager, PresenterRegistry,
    SharedPresenter,
  },
  scheduler::{Immediate, LocalScheduler, LocalTask},
  screen::{Host, Screen, ScreenContext, ScreenDelegate, ScreenId, Transition},
  subject::{LocalBehaviorSubject, LocalSubject},
  subscription::{LocalSubscription, SubscriptionLike, SubscriptionWrapper, Teardown},
};
