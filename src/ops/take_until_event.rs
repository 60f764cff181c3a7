//! TakeUntilEvent operator implementation
//!
//! Emits the values of the source until the lifecycle reaches the event its
//! scope resolves to, then completes.

use std::convert::Infallible;

use crate::{
  lifecycle::{LifecycleEvent, LifecycleScope, LifecycleStream},
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Source bound to a lifecycle scope, built by `LifecycleTransformer`.
#[derive(Clone)]
pub struct TakeUntilEvent<S> {
  pub(crate) source: S,
  pub(crate) lifecycle: LifecycleStream,
  pub(crate) scope: LifecycleScope,
}

/// Progress of one bound subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScopeState {
  /// No lifecycle event seen yet.
  Pending,
  /// Waiting for this event.
  Until(LifecycleEvent),
  Ended,
}

impl ScopeState {
  /// The first event seen (the replayed one, if any) resolves the scope,
  /// later events can only end it. Nothing follows `Destroy`, so seeing it
  /// always ends the scope.
  fn advance(self, scope: LifecycleScope, event: LifecycleEvent) -> ScopeState {
    match self {
      ScopeState::Pending => match scope {
        LifecycleScope::UntilEvent(target)
          if event == target || event == LifecycleEvent::Destroy =>
        {
          ScopeState::Ended
        }
        LifecycleScope::UntilEvent(target) => ScopeState::Until(target),
        LifecycleScope::Corresponding => match event.corresponding() {
          Ok(target) => ScopeState::Until(target),
          Err(err) => {
            tracing::warn!(%err, "lifecycle binding completed without items");
            ScopeState::Ended
          }
        },
      },
      ScopeState::Until(target) if event == target || event == LifecycleEvent::Destroy => {
        ScopeState::Ended
      }
      other => other,
    }
  }
}

impl<S> Observable for TakeUntilEvent<S>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> LocalSubscription
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    let TakeUntilEvent { source, lifecycle, scope } = self;
    let downstream = MutRc::own(Some(observer));
    let subscription = LocalSubscription::default();

    // The lifecycle goes first: its replayed value may end the scope before
    // the source gets a chance to emit.
    let notifier =
      ScopeObserver::new::<S::Item, S::Err>(downstream.clone(), subscription.clone(), scope);
    subscription.add(lifecycle.actual_subscribe(notifier));
    if downstream.is_none() {
      return subscription;
    }

    let bound = BoundObserver { downstream, subscription: subscription.clone() };
    subscription.add(source.actual_subscribe(bound));
    subscription
  }
}

/// Observer for the source, forwards to the shared downstream.
pub struct BoundObserver<O> {
  downstream: MutRc<Option<O>>,
  subscription: LocalSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for BoundObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.downstream.next(value); }

  fn error(mut self, err: Err) {
    Observer::<Item, Err>::error(self.downstream, err);
    self.subscription.unsubscribe();
  }

  fn complete(mut self) {
    Observer::<Item, Err>::complete(self.downstream);
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool { Observer::<Item, Err>::is_closed(&self.downstream) }
}

/// Observer for the lifecycle stream.
///
/// Holds a function pointer to complete the downstream, which erases the
/// source's Item/Err types from the lifecycle side.
pub struct ScopeObserver<O> {
  downstream: MutRc<Option<O>>,
  subscription: LocalSubscription,
  scope: LifecycleScope,
  state: ScopeState,
  complete_fn: fn(MutRc<Option<O>>),
}

impl<O> ScopeObserver<O> {
  fn new<Item, Err>(
    downstream: MutRc<Option<O>>, subscription: LocalSubscription, scope: LifecycleScope,
  ) -> Self
  where
    O: Observer<Item, Err>,
  {
    Self {
      downstream,
      subscription,
      scope,
      state: ScopeState::Pending,
      complete_fn: |o| Observer::<Item, Err>::complete(o),
    }
  }

  fn end(&mut self) {
    (self.complete_fn)(self.downstream.clone());
    self.subscription.unsubscribe();
  }
}

impl<O> Observer<LifecycleEvent, Infallible> for ScopeObserver<O> {
  fn next(&mut self, event: LifecycleEvent) {
    if self.state == ScopeState::Ended {
      return;
    }
    self.state = self.state.advance(self.scope, event);
    if self.state == ScopeState::Ended {
      self.end();
    }
  }

  fn error(self, _err: Infallible) {}

  fn complete(self) {
    // The lifecycle itself never completes while a screen lives.
  }

  fn is_closed(&self) -> bool { self.state == ScopeState::Ended || self.downstream.is_none() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::{
    lifecycle::{LifecycleEvent::*, LifecycleTransformer},
    prelude::*,
  };

  struct Probe {
    values: Rc<RefCell<Vec<i32>>>,
    completed: Rc<RefCell<bool>>,
  }

  fn bind(
    source: LocalSubject<i32, Infallible>, transformer: LifecycleTransformer,
  ) -> (Probe, LocalSubscription) {
    let probe = Probe { values: <_>::default(), completed: <_>::default() };
    let c_values = probe.values.clone();
    let c_completed = probe.completed.clone();
    let subscription = source
      .compose(transformer)
      .subscribe_all(
        move |v| c_values.borrow_mut().push(v),
        |_| {},
        move || *c_completed.borrow_mut() = true,
      )
      .into_inner();
    (probe, subscription)
  }

  fn lifecycle_at(events: &[LifecycleEvent]) -> LifecycleSubject {
    let mut lifecycle = LifecycleSubject::empty();
    for e in events {
      lifecycle.next(*e);
    }
    lifecycle
  }

  #[test]
  fn until_event_passes_items_then_completes() {
    let mut lifecycle = lifecycle_at(&[Create, Start]);
    let mut source = LocalSubject::new();
    let (probe, _) =
      bind(source.clone(), LifecycleTransformer::until_event(lifecycle.clone().hide(), Stop));

    source.next(1);
    source.next(2);
    lifecycle.next(Resume);
    lifecycle.next(Pause);
    source.next(3);
    assert!(!*probe.completed.borrow());

    lifecycle.next(Stop);
    source.next(4);
    assert_eq!(*probe.values.borrow(), vec![1, 2, 3]);
    assert!(*probe.completed.borrow());
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(lifecycle.subscriber_count(), 0);
  }

  #[test]
  fn until_event_already_current_completes_at_once() {
    let lifecycle = lifecycle_at(&[Create, Start, Resume, Pause, Stop, Destroy]);
    let mut source = LocalSubject::new();
    let (probe, subscription) =
      bind(source.clone(), LifecycleTransformer::until_event(lifecycle.clone().hide(), Destroy));

    source.next(1);
    assert!(probe.values.borrow().is_empty());
    assert!(*probe.completed.borrow());
    assert!(subscription.is_closed());
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(lifecycle.subscriber_count(), 0);
  }

  #[test]
  fn until_event_after_destroy_completes_at_once() {
    let lifecycle = lifecycle_at(&[Create, Start, Stop, Destroy]);
    let (probe, _) =
      bind(LocalSubject::new(), LifecycleTransformer::until_event(lifecycle.hide(), Stop));
    assert!(*probe.completed.borrow());
  }

  #[test]
  fn until_event_with_cold_source_after_event_emits_nothing() {
    let lifecycle = lifecycle_at(&[Create, Destroy]);
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    observable::from_iter(0..5)
      .compose(LifecycleTransformer::until_event(lifecycle.hide(), Destroy))
      .subscribe(move |v| c_values.borrow_mut().push(v));
    assert!(values.borrow().is_empty());
  }

  #[test]
  fn until_event_before_any_event_waits_for_it() {
    let mut lifecycle = LifecycleSubject::empty();
    let mut source = LocalSubject::new();
    let (probe, _) =
      bind(source.clone(), LifecycleTransformer::until_event(lifecycle.clone().hide(), Create));
    source.next(1);
    lifecycle.next(Create);
    source.next(2);
    assert_eq!(*probe.values.borrow(), vec![1]);
    assert!(*probe.completed.borrow());
  }

  #[test]
  fn corresponding_resume_ends_at_pause() {
    let mut lifecycle = lifecycle_at(&[Create, Start, Resume]);
    let mut source = LocalSubject::new();
    let (probe, _) =
      bind(source.clone(), LifecycleTransformer::corresponding(lifecycle.clone().hide()));

    source.next(1);
    assert!(!*probe.completed.borrow());
    lifecycle.next(Pause);
    source.next(2);
    assert_eq!(*probe.values.borrow(), vec![1]);
    assert!(*probe.completed.borrow());
  }

  #[test]
  fn corresponding_create_ends_at_destroy() {
    let mut lifecycle = lifecycle_at(&[Create]);
    let mut source = LocalSubject::new();
    let (probe, _) =
      bind(source.clone(), LifecycleTransformer::corresponding(lifecycle.clone().hide()));

    for e in [Start, Resume, Pause, Stop] {
      lifecycle.next(e);
      source.next(1);
    }
    assert!(!*probe.completed.borrow());
    lifecycle.next(Destroy);
    assert!(*probe.completed.borrow());
    assert_eq!(probe.values.borrow().len(), 4);
  }

  #[test]
  fn corresponding_after_destroy_completes_without_items() {
    let lifecycle = lifecycle_at(&[Create, Destroy]);
    let mut source = LocalSubject::new();
    let (probe, _) = bind(source.clone(), LifecycleTransformer::corresponding(lifecycle.hide()));
    source.next(1);
    assert!(probe.values.borrow().is_empty());
    assert!(*probe.completed.borrow());
  }

  #[test]
  fn corresponding_before_any_event_pairs_with_first() {
    let mut lifecycle = LifecycleSubject::empty();
    let (probe, _) =
      bind(LocalSubject::new(), LifecycleTransformer::corresponding(lifecycle.clone().hide()));
    lifecycle.next(Create);
    lifecycle.next(Start);
    assert!(!*probe.completed.borrow());
    lifecycle.next(Stop);
    assert!(!*probe.completed.borrow());
    lifecycle.next(Destroy);
    assert!(*probe.completed.borrow());
  }

  #[test]
  fn unsubscribe_detaches_from_both_streams() {
    let lifecycle = lifecycle_at(&[Create]);
    let source = LocalSubject::<i32, Infallible>::new();
    let (probe, mut subscription) =
      bind(source.clone(), LifecycleTransformer::until_event(lifecycle.clone().hide(), Destroy));
    subscription.unsubscribe();
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(lifecycle.subscriber_count(), 0);
    assert!(!*probe.completed.borrow());
    // already closed, no-op
    subscription.unsubscribe();
  }

  #[test]
  fn source_completion_detaches_from_lifecycle() {
    let lifecycle = lifecycle_at(&[Create]);
    let source = LocalSubject::<i32, Infallible>::new();
    let (probe, _) =
      bind(source.clone(), LifecycleTransformer::until_event(lifecycle.clone().hide(), Destroy));
    source.complete();
    assert!(*probe.completed.borrow());
    assert_eq!(lifecycle.subscriber_count(), 0);
  }
}
