//! Presenters and their retention across screen recreation.
//!
//! A screen declares the presenter it needs with a [`PresenterDescriptor`].
//! On creation it asks a [`PresenterRegistry`] for an instance: the registry
//! hands back the retained one when the screen is being recreated in the
//! same process, or builds a fresh one from the saved state otherwise.

use std::{any::Any, cell::RefCell, collections::HashMap, fmt, rc::Rc};

use tracing::{debug, warn};

use crate::{
  activity_result::ActivityResult,
  bundle::{maybe_bundle, Bundle, Intent},
  error::ScreenError,
  screen::ScreenId,
};

/// Saved-state key of the retained presenter's id.
pub const PRESENTER_ID_KEY: &str = "presenter_id";
/// Saved-state key of the presenter's own snapshot.
pub const PRESENTER_STATE_KEY: &str = "presenter_state";

/// A presenter as shared between a screen and the registry.
pub type SharedPresenter<P> = Rc<RefCell<P>>;

/// Business logic paired with one screen.
///
/// Every hook defaults to a no-op.
pub trait Presenter: 'static {
  fn on_intent(&mut self, _intent: &Intent) {}

  fn on_start(&mut self) {}

  fn on_resume(&mut self) {}

  fn on_pause(&mut self) {}

  fn on_stop(&mut self) {}

  fn on_destroy(&mut self) {}

  fn on_activity_result(&mut self, _result: ActivityResult) {}

  /// Writes the state needed to rebuild this presenter after the process is
  /// gone.
  fn save(&self, _state: &mut Bundle) {}
}

/// Declares how to build a presenter, optionally from a saved snapshot.
pub struct PresenterDescriptor<P> {
  name: &'static str,
  factory: Rc<dyn Fn(Option<&Bundle>) -> P>,
}

impl<P> Clone for PresenterDescriptor<P> {
  fn clone(&self) -> Self { Self { name: self.name, factory: self.factory.clone() } }
}

impl<P> fmt::Debug for PresenterDescriptor<P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PresenterDescriptor").field("name", &self.name).finish()
  }
}

impl<P> PresenterDescriptor<P> {
  pub fn new(name: &'static str, factory: impl Fn(Option<&Bundle>) -> P + 'static) -> Self {
    Self { name, factory: Rc::new(factory) }
  }

  #[inline]
  pub fn name(&self) -> &'static str { self.name }

  /// Builds a presenter, from `state` when there is one.
  pub fn create(&self, state: Option<&Bundle>) -> P { (self.factory)(state) }
}

impl<P: Default> PresenterDescriptor<P> {
  /// Descriptor of a stateless presenter built with `Default`.
  pub fn with_default(name: &'static str) -> Self { Self::new(name, |_| P::default()) }
}

/// Identity of a retained presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PresenterId(pub(crate) u64);

impl fmt::Display for PresenterId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Keeps presenters alive across a destroy/recreate of their screen.
pub trait PresenterRegistry {
  /// Returns the presenter to attach to `owner`: the retained instance named
  /// by `saved`, or a new one built from `saved`.
  fn fetch<P: Presenter>(
    &self, owner: ScreenId, descriptor: &PresenterDescriptor<P>, saved: Option<&Bundle>,
  ) -> Result<SharedPresenter<P>, ScreenError>;

  /// Snapshots `presenter` into `out`.
  fn save<P: Presenter>(&self, presenter: &SharedPresenter<P>, out: &mut Bundle);

  /// Forgets `presenter` for good.
  fn destroy<P: Presenter>(&self, presenter: &SharedPresenter<P>);
}

struct Retained {
  owner: ScreenId,
  presenter: Rc<dyn Any>,
}

#[derive(Default)]
struct Retention {
  next_id: u64,
  presenters: HashMap<PresenterId, Retained>,
}

/// In-memory [`PresenterRegistry`], scoped to whatever owns it (usually the
/// application's `ScreenContext`).
#[derive(Default)]
pub struct PresenterManager {
  retention: RefCell<Retention>,
}

fn erased<P: Presenter>(presenter: &SharedPresenter<P>) -> *const () {
  Rc::as_ptr(presenter) as *const ()
}

impl PresenterManager {
  pub fn new() -> Self { Self::default() }

  /// Number of retained presenters.
  pub fn len(&self) -> usize { self.retention.borrow().presenters.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn contains<P: Presenter>(&self, presenter: &SharedPresenter<P>) -> bool {
    self.id_of(presenter).is_some()
  }

  /// The screen currently holding `presenter`.
  pub fn owner_of<P: Presenter>(&self, presenter: &SharedPresenter<P>) -> Option<ScreenId> {
    let id = self.id_of(presenter)?;
    self.retention.borrow().presenters.get(&id).map(|r| r.owner)
  }

  /// Drops every retained presenter.
  pub fn clear(&self) {
    let dropped = std::mem::take(&mut self.retention.borrow_mut().presenters);
    debug!(count = dropped.len(), "presenter registry cleared");
  }

  fn id_of<P: Presenter>(&self, presenter: &SharedPresenter<P>) -> Option<PresenterId> {
    let ptr = erased(presenter);
    self
      .retention
      .borrow()
      .presenters
      .iter()
      .find(|(_, r)| Rc::as_ptr(&r.presenter) as *const () == ptr)
      .map(|(id, _)| *id)
  }

  /// Moves a retained presenter to `owner`, if `id` is still retained.
  fn reclaim<P: Presenter>(
    &self, id: PresenterId, owner: ScreenId, descriptor: &PresenterDescriptor<P>,
  ) -> Result<Option<SharedPresenter<P>>, ScreenError> {
    let mut retention = self.retention.borrow_mut();
    let Some(retained) = retention.presenters.get_mut(&id) else {
      return Ok(None);
    };
    let presenter = retained
      .presenter
      .clone()
      .downcast::<RefCell<P>>()
      .map_err(|_| ScreenError::PresenterTypeMismatch { id, expected: descriptor.name() })?;
    debug!(%id, presenter = descriptor.name(), from = %retained.owner, to = %owner, "presenter reused");
    retained.owner = owner;
    Ok(Some(presenter))
  }
}

impl PresenterRegistry for PresenterManager {
  fn fetch<P: Presenter>(
    &self, owner: ScreenId, descriptor: &PresenterDescriptor<P>, saved: Option<&Bundle>,
  ) -> Result<SharedPresenter<P>, ScreenError> {
    let saved_id = saved
      .and_then(|b| b.get_int(PRESENTER_ID_KEY))
      .and_then(|id| u64::try_from(id).ok())
      .map(PresenterId);
    if let Some(id) = saved_id {
      if let Some(presenter) = self.reclaim(id, owner, descriptor)? {
        return Ok(presenter);
      }
    }

    let state = maybe_bundle(saved, PRESENTER_STATE_KEY);
    let presenter = Rc::new(RefCell::new(descriptor.create(state)));
    let mut retention = self.retention.borrow_mut();
    let id = PresenterId(retention.next_id);
    retention.next_id += 1;
    retention
      .presenters
      .insert(id, Retained { owner, presenter: presenter.clone() });
    debug!(%id, presenter = descriptor.name(), %owner, restored = state.is_some(), "presenter created");
    Ok(presenter)
  }

  fn save<P: Presenter>(&self, presenter: &SharedPresenter<P>, out: &mut Bundle) {
    match self.id_of(presenter) {
      Some(id) => {
        // ids are handed out sequentially from zero, far below i64::MAX
        out.put_int(PRESENTER_ID_KEY, id.0 as i64);
      }
      None => warn!("saving a presenter the registry does not retain"),
    }
    let mut state = Bundle::new();
    presenter.borrow().save(&mut state);
    out.put_bundle(PRESENTER_STATE_KEY, state);
  }

  fn destroy<P: Presenter>(&self, presenter: &SharedPresenter<P>) {
    if let Some(id) = self.id_of(presenter) {
      self.retention.borrow_mut().presenters.remove(&id);
      debug!(%id, "presenter released");
    }
  }
}
