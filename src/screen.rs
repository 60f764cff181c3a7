//! The lifecycle-bound screen base.
//!
//! A host owns one [`Screen`] per visible screen and forwards its lifecycle
//! callbacks to it. The screen republishes them as a [`LifecycleStream`],
//! keeps the paired presenter in step, and routes back signals to the host on
//! the main scheduler.

use std::{
  cell::RefCell,
  convert::Infallible,
  fmt,
  rc::Rc,
  sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, error};

use crate::{
  activity_result::ActivityResult,
  bundle::{maybe_bundle, Bundle, Intent},
  error::ScreenError,
  lifecycle::{LifecycleEvent, LifecycleProvider, LifecycleStream, LifecycleSubject},
  observable::ObservableExt,
  observer::Observer,
  presenter::{Presenter, PresenterDescriptor, PresenterManager, PresenterRegistry, SharedPresenter},
  scheduler::LocalScheduler,
  subject::LocalSubject,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Saved-state key of the presenter envelope.
pub const PRESENTER_KEY: &str = "presenter";

static NEXT_SCREEN_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a screen instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub(crate) u64);

impl ScreenId {
  fn next() -> Self { ScreenId(NEXT_SCREEN_ID.fetch_add(1, Ordering::Relaxed)) }
}

impl fmt::Display for ScreenId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "screen-{}", self.0) }
}

/// Enter/exit animation pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Transition {
  pub enter: i32,
  pub exit: i32,
}

/// What the screen needs from the UI toolkit hosting it.
pub trait Host {
  fn navigate_back(&mut self) -> Result<(), ScreenError>;

  fn start_screen(&mut self, target: &Intent);

  fn override_transition(&mut self, transition: Transition);

  /// `true` when the current destroy is final rather than a recreate.
  fn is_finishing(&self) -> bool;
}

/// Per-screen customization.
pub trait ScreenDelegate: 'static {
  type Presenter: Presenter;

  /// The presenter this screen pairs with, `None` for none.
  fn presenter_descriptor(&self) -> Option<PresenterDescriptor<Self::Presenter>> { None }

  /// Animation applied after a back navigation.
  fn exit_transition(&self) -> Option<Transition> { None }
}

/// Process-scoped collaborators every screen shares: the presenter registry
/// and the main-thread scheduler.
pub struct ScreenContext<R = PresenterManager> {
  registry: Rc<R>,
  main: Rc<dyn LocalScheduler>,
}

impl<R> Clone for ScreenContext<R> {
  fn clone(&self) -> Self { Self { registry: self.registry.clone(), main: self.main.clone() } }
}

impl<R: PresenterRegistry> ScreenContext<R> {
  pub fn new(registry: R, main: impl LocalScheduler + 'static) -> Self {
    Self { registry: Rc::new(registry), main: Rc::new(main) }
  }

  #[inline]
  pub fn registry(&self) -> &Rc<R> { &self.registry }

  #[inline]
  pub fn main(&self) -> &Rc<dyn LocalScheduler> { &self.main }
}

/// Runs one back navigation against the host.
fn go_back<H: Host, D: ScreenDelegate>(host: &RefCell<H>, delegate: &D) -> Result<(), ScreenError> {
  let mut host = host.try_borrow_mut().map_err(|_| ScreenError::HostBusy)?;
  host.navigate_back()?;
  if let Some(transition) = delegate.exit_transition() {
    host.override_transition(transition);
  }
  Ok(())
}

pub struct Screen<D: ScreenDelegate, H, R = PresenterManager> {
  id: ScreenId,
  delegate: Rc<D>,
  host: Rc<RefCell<H>>,
  context: ScreenContext<R>,
  presenter: Option<SharedPresenter<D::Presenter>>,
  lifecycle: LifecycleSubject,
  back: LocalSubject<(), Infallible>,
  disposables: LocalSubscription,
}

impl<D, H, R> Screen<D, H, R>
where
  D: ScreenDelegate,
  H: Host + 'static,
  R: PresenterRegistry,
{
  pub fn new(delegate: D, host: Rc<RefCell<H>>, context: ScreenContext<R>) -> Self {
    Self {
      id: ScreenId::next(),
      delegate: Rc::new(delegate),
      host,
      context,
      presenter: None,
      lifecycle: LifecycleSubject::empty(),
      back: LocalSubject::new(),
      disposables: LocalSubscription::default(),
    }
  }

  #[inline]
  pub fn id(&self) -> ScreenId { self.id }

  #[inline]
  pub fn delegate(&self) -> &D { &self.delegate }

  #[inline]
  pub fn host(&self) -> &Rc<RefCell<H>> { &self.host }

  pub fn presenter(&self) -> Option<SharedPresenter<D::Presenter>> { self.presenter.clone() }

  /// The latest published lifecycle event.
  pub fn current_event(&self) -> Option<LifecycleEvent> { self.lifecycle.peek() }

  /// Work canceled in bulk when this screen is destroyed.
  #[inline]
  pub fn disposables(&self) -> &LocalSubscription { &self.disposables }

  pub fn add_disposable<S: SubscriptionLike + 'static>(&self, subscription: S) {
    self.disposables.add(subscription);
  }

  /// Emits one back signal, handled on the main scheduler while the screen
  /// is started.
  pub fn back(&self) { self.back.clone().next(()) }

  pub fn exit_transition(&self) -> Option<Transition> { self.delegate.exit_transition() }

  pub fn start_with_transition(&self, target: &Intent, enter: i32, exit: i32) {
    let mut host = self.host.borrow_mut();
    host.start_screen(target);
    host.override_transition(Transition { enter, exit });
  }

  pub fn on_create(&mut self, intent: &Intent, saved: Option<&Bundle>) -> Result<(), ScreenError> {
    self.publish(LifecycleEvent::Create);
    self.assign_presenter(saved)?;
    self.with_presenter(|p| p.on_intent(intent));
    self.disposables = LocalSubscription::default();
    Ok(())
  }

  pub fn on_new_intent(&mut self, intent: &Intent) { self.with_presenter(|p| p.on_intent(intent)); }

  pub fn on_start(&mut self) {
    self.publish(LifecycleEvent::Start);
    self.with_presenter(|p| p.on_start());
    self.subscribe_back();
  }

  pub fn on_resume(&mut self) {
    self.publish(LifecycleEvent::Resume);
    self.with_presenter(|p| p.on_resume());
  }

  pub fn on_pause(&mut self) {
    self.with_presenter(|p| p.on_pause());
    self.publish(LifecycleEvent::Pause);
  }

  pub fn on_stop(&mut self) {
    self.with_presenter(|p| p.on_stop());
    self.publish(LifecycleEvent::Stop);
  }

  /// Ends this screen instance and detaches its presenter. The registry
  /// releases the presenter only when the host reports the destroy as final,
  /// otherwise it keeps it for the next instance.
  pub fn on_destroy(&mut self) {
    self.with_presenter(|p| p.on_destroy());
    self.publish(LifecycleEvent::Destroy);
    self.disposables.unsubscribe();

    let Some(presenter) = self.presenter.take() else {
      return;
    };
    if self.host.borrow().is_finishing() {
      self.context.registry.destroy(&presenter);
      debug!(screen = %self.id, "presenter released on final destroy");
    } else {
      debug!(screen = %self.id, "presenter detached, retained for the next instance");
    }
  }

  /// Stores the presenter envelope under [`PRESENTER_KEY`], empty when there
  /// is no presenter.
  pub fn on_save_state(&self, out: &mut Bundle) {
    let mut envelope = Bundle::new();
    if let Some(presenter) = &self.presenter {
      self.context.registry.save(presenter, &mut envelope);
    }
    out.put_bundle(PRESENTER_KEY, envelope);
  }

  pub fn on_activity_result(&mut self, request_code: i32, result_code: i32, intent: Option<Intent>) {
    let result = ActivityResult::create(request_code, result_code, intent);
    self.with_presenter(|p| p.on_activity_result(result));
  }

  pub fn on_back_pressed(&self) { self.back() }

  fn publish(&mut self, event: LifecycleEvent) {
    debug!(screen = %self.id, ?event, "lifecycle");
    self.lifecycle.next(event);
  }

  fn with_presenter(&self, f: impl FnOnce(&mut D::Presenter)) {
    if let Some(presenter) = &self.presenter {
      f(&mut *presenter.borrow_mut());
    }
  }

  fn assign_presenter(&mut self, saved: Option<&Bundle>) -> Result<(), ScreenError> {
    if self.presenter.is_some() {
      return Ok(());
    }
    let Some(descriptor) = self.delegate.presenter_descriptor() else {
      return Ok(());
    };
    let presenter =
      self.context.registry.fetch(self.id, &descriptor, maybe_bundle(saved, PRESENTER_KEY))?;
    self.presenter = Some(presenter);
    Ok(())
  }

  fn subscribe_back(&self) {
    let host = self.host.clone();
    let delegate = self.delegate.clone();
    let screen = self.id;
    let subscription = self
      .back
      .clone()
      .compose(self.bind_until_event(LifecycleEvent::Stop))
      .observe_on(self.context.main.clone())
      .subscribe(move |_| {
        if let Err(err) = go_back(&*host, &*delegate) {
          error!(%screen, %err, "back navigation failed");
        }
      });
    self.disposables.add(subscription.into_inner());
  }
}

impl<D, H, R> LifecycleProvider for Screen<D, H, R>
where
  D: ScreenDelegate,
{
  fn lifecycle(&self) -> LifecycleStream { self.lifecycle.clone().hide() }
}
