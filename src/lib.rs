//! # rxscreen: lifecycle-bound screens on a local Rx core
//!
//! A [`Screen`](screen::Screen) turns a host's lifecycle callbacks into a
//! replaying [`LifecycleStream`](lifecycle::LifecycleStream). Any stream can
//! then be bound to it and completes by itself when the screen stops or is
//! destroyed:
//!
//! ```rust
//! use std::{cell::RefCell, convert::Infallible, rc::Rc};
//!
//! use rxscreen::prelude::*;
//!
//! let mut lifecycle = LifecycleSubject::empty();
//! lifecycle.next(LifecycleEvent::Create);
//! lifecycle.next(LifecycleEvent::Start);
//!
//! let mut clicks = LocalSubject::<u32, Infallible>::new();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! clicks
//!   .clone()
//!   .compose(LifecycleTransformer::corresponding(lifecycle.clone().hide()))
//!   .subscribe(move |v| c_seen.borrow_mut().push(v));
//!
//! clicks.next(1);
//! lifecycle.next(LifecycleEvent::Stop);
//! clicks.next(2);
//! assert_eq!(*seen.borrow(), [1]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A single-thread stream, subscribed with an [`Observer`] |
//! | [`LifecycleProvider`] | `bind_until_event` / `bind_to_lifecycle` |
//! | [`Screen`] | Lifecycle publisher, presenter owner, back navigation |
//! | [`PresenterManager`] | Keeps presenters alive across a recreate |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): use a `futures` `LocalSpawner` as the
//!   main-thread scheduler
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`LifecycleProvider`]: lifecycle::LifecycleProvider
//! [`Screen`]: screen::Screen
//! [`PresenterManager`]: presenter::PresenterManager

pub mod activity_result;
pub mod bundle;
pub mod error;
pub mod lifecycle;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod presenter;
pub mod rc;
pub mod scheduler;
pub mod screen;
pub mod subject;
pub mod subscription;

// Re-export the prelude module
pub use prelude::*;
