use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  scheduler::LocalScheduler,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Re-emits every notification of the source from a task scheduled on
/// `scheduler`.
///
/// Tasks still queued when the subscription is unsubscribed are dropped. A
/// completion is queued like any item, so it reaches the observer after the
/// items emitted before it. Delivering an error or a completion closes the
/// subscription.
#[derive(Clone)]
pub struct ObserveOn<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<S, SD> Observable for ObserveOn<S, SD>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
  SD: LocalScheduler + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> LocalSubscription
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    let subscription = LocalSubscription::default();
    let observer = ObserveOnObserver {
      observer: MutRc::own(Some(observer)),
      scheduler: self.scheduler,
      subscription: subscription.clone(),
    };
    let upstream = self.source.actual_subscribe(observer);
    subscription.add(upstream);
    subscription
  }
}

pub struct ObserveOnObserver<O, SD> {
  observer: MutRc<Option<O>>,
  scheduler: SD,
  subscription: LocalSubscription,
}

impl<O, SD> ObserveOnObserver<O, SD> {
  fn schedule<F>(&self, task: F)
  where
    SD: LocalScheduler,
    F: FnOnce(MutRc<Option<O>>) + 'static,
    O: 'static,
  {
    if self.subscription.is_closed() {
      return;
    }
    let observer = self.observer.clone();
    let subscription = self.subscription.clone();
    self.scheduler.schedule(Box::new(move || {
      if !subscription.is_closed() {
        task(observer)
      }
    }));
  }
}

impl<Item, Err, O, SD> Observer<Item, Err> for ObserveOnObserver<O, SD>
where
  O: Observer<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
  SD: LocalScheduler,
{
  fn next(&mut self, value: Item) { self.schedule(move |mut observer| observer.next(value)); }

  fn error(self, err: Err) {
    let mut subscription = self.subscription.clone();
    self.schedule(move |observer| {
      Observer::<Item, Err>::error(observer, err);
      subscription.unsubscribe();
    });
  }

  fn complete(self) {
    let mut subscription = self.subscription.clone();
    self.schedule(move |observer| {
      Observer::<Item, Err>::complete(observer);
      subscription.unsubscribe();
    });
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.subscription.is_closed() || Observer::<Item, Err>::is_closed(&self.observer)
  }
}
