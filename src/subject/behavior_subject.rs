use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subject::LocalSubject,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// A subject that remembers the latest value and replays it to every new
/// subscriber.
///
/// Unlike the classic behavior subject it may start empty: until the first
/// `next` new subscribers receive nothing.
pub struct LocalBehaviorSubject<Item, Err> {
  pub(crate) subject: LocalSubject<Item, Err>,
  pub(crate) value: MutRc<Option<Item>>,
}

impl<Item, Err> Clone for LocalBehaviorSubject<Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), value: self.value.clone() } }
}

impl<Item, Err> Default for LocalBehaviorSubject<Item, Err> {
  fn default() -> Self { Self::empty() }
}

impl<Item, Err> LocalBehaviorSubject<Item, Err> {
  /// A subject holding `value` as its current value.
  #[inline]
  pub fn new(value: Item) -> Self {
    Self { subject: LocalSubject::default(), value: MutRc::own(Some(value)) }
  }

  /// A subject without a current value.
  #[inline]
  pub fn empty() -> Self { Self { subject: LocalSubject::default(), value: MutRc::own(None) } }

  #[inline]
  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }
}

impl<Item: Clone, Err> LocalBehaviorSubject<Item, Err> {
  /// The latest value, if any was published.
  #[inline]
  pub fn peek(&self) -> Option<Item> { self.value.rc_deref().clone() }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for LocalBehaviorSubject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) {
    *self.value.rc_deref_mut() = Some(value.clone());
    self.subject.next(value)
  }

  #[inline]
  fn error(self, err: Err) { self.subject.error(err) }

  #[inline]
  fn complete(self) { self.subject.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.subject.is_closed() }
}

impl<Item: Clone + 'static, Err: 'static> Observable for LocalBehaviorSubject<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, mut observer: O) -> LocalSubscription
  where
    O: Observer<Item, Err> + 'static,
  {
    if !self.subject.state.borrow().stopped {
      let current = self.value.rc_deref().clone();
      if let Some(v) = current {
        observer.next(v);
      }
      // The replayed value may already have finished the observer.
      if observer.is_closed() {
        let mut subscription = LocalSubscription::default();
        subscription.unsubscribe();
        return subscription;
      }
    }
    self.subject.actual_subscribe(observer)
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn replays_latest_to_late_subscriber() {
    let mut subject = LocalBehaviorSubject::<i32, Infallible>::empty();
    subject.next(1);
    subject.next(2);

    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    subject.clone().subscribe(move |v| c_values.borrow_mut().push(v));
    subject.next(3);

    assert_eq!(*values.borrow(), vec![2, 3]);
    assert_eq!(subject.peek(), Some(3));
  }

  #[test]
  fn empty_subject_replays_nothing() {
    let mut subject = LocalBehaviorSubject::<i32, Infallible>::empty();
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    subject.clone().subscribe(move |v| c_values.borrow_mut().push(v));
    assert!(values.borrow().is_empty());

    subject.next(7);
    assert_eq!(*values.borrow(), vec![7]);
  }

  #[test]
  fn seeded_subject() {
    let subject = LocalBehaviorSubject::<i32, Infallible>::new(5);
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    subject.clone().subscribe(move |v| c_values.borrow_mut().push(v));
    assert_eq!(*values.borrow(), vec![5]);
    assert_eq!(subject.subscriber_count(), 1);
  }
}
