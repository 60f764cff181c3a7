use crate::{observable::Observable, observer::Observer, subscription::LocalSubscription};

/// Read-only view of an observable.
///
/// `Hide` forwards subscriptions to the source but implements no `Observer`,
/// so holders of a hidden subject cannot publish into it.
pub struct Hide<S>(S);

impl<S> Hide<S> {
  #[inline]
  pub(crate) fn new(source: S) -> Self { Hide(source) }
}

impl<S: Clone> Clone for Hide<S> {
  #[inline]
  fn clone(&self) -> Self { Hide(self.0.clone()) }
}

impl<S: Observable> Observable for Hide<S> {
  type Item = S::Item;
  type Err = S::Err;

  #[inline]
  fn actual_subscribe<O>(self, observer: O) -> LocalSubscription
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    self.0.actual_subscribe(observer)
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn forwards_subscriptions() {
    let mut subject = LocalSubject::<i32, Infallible>::new();
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    subject.clone().hide().subscribe(move |v| c_values.borrow_mut().push(v));

    subject.next(1);
    assert_eq!(*values.borrow(), vec![1]);
  }
}
