use std::convert::Infallible;

use crate::{
  observer::{FnMutObserver, Observer, ObserverAll},
  ops::{hide::Hide, observe_on::ObserveOn},
  scheduler::LocalScheduler,
  subscription::{LocalSubscription, SubscriptionWrapper},
};

mod from_iter;
pub use from_iter::{from_iter, of, ObservableIter};

/// A producer of `Item`s, local to the current thread.
///
/// Observers are `'static` because subscriptions routinely outlive the call
/// that created them, a lifecycle-bound subscription lives until its paired
/// event.
pub trait Observable: Sized {
  type Item;
  type Err;

  fn actual_subscribe<O>(self, observer: O) -> LocalSubscription
  where
    O: Observer<Self::Item, Self::Err> + 'static;
}

/// Wraps an observable into another observable, `compose` applies it.
pub trait Transformer<S: Observable> {
  type Output: Observable<Item = S::Item, Err = S::Err>;

  fn transform(self, source: S) -> Self::Output;
}

pub trait ObservableExt: Observable {
  /// Subscribes with a `next` handler only, for sources that cannot fail.
  fn subscribe<N>(self, next: N) -> SubscriptionWrapper<LocalSubscription>
  where
    Self: Observable<Err = Infallible>,
    N: FnMut(Self::Item) + 'static,
  {
    SubscriptionWrapper(self.actual_subscribe(FnMutObserver(next)))
  }

  fn subscribe_all<N, E, C>(
    self, next: N, error: E, complete: C,
  ) -> SubscriptionWrapper<LocalSubscription>
  where
    N: FnMut(Self::Item) + 'static,
    E: FnOnce(Self::Err) + 'static,
    C: FnOnce() + 'static,
  {
    SubscriptionWrapper(self.actual_subscribe(ObserverAll::new(next, error, complete)))
  }

  /// Applies a stream transformer, e.g. a lifecycle binding.
  #[inline]
  fn compose<T: Transformer<Self>>(self, transformer: T) -> T::Output {
    transformer.transform(self)
  }

  /// Delivers every notification from a task scheduled on `scheduler`.
  #[inline]
  fn observe_on<SD: LocalScheduler + Clone + 'static>(self, scheduler: SD) -> ObserveOn<Self, SD> {
    ObserveOn { source: self, scheduler }
  }

  /// Hides the identity of the source, the result can be subscribed to but
  /// never published into.
  #[inline]
  fn hide(self) -> Hide<Self> { Hide::new(self) }
}

impl<T: Observable> ObservableExt for T {}
