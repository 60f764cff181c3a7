use std::convert::Infallible;

use crate::{observable::Observable, observer::Observer, subscription::LocalSubscription};

/// Cold source emitting every item of an iterator, then completing.
#[derive(Clone)]
pub struct ObservableIter<It>(It);

/// Creates an observable that produces values from an iterator.
///
/// Emission stops early once the observer reports itself closed.
pub fn from_iter<It: IntoIterator>(iter: It) -> ObservableIter<It> { ObservableIter(iter) }

/// Creates an observable producing a single value.
pub fn of<Item>(v: Item) -> ObservableIter<std::iter::Once<Item>> { from_iter(std::iter::once(v)) }

impl<It: IntoIterator> Observable for ObservableIter<It> {
  type Item = It::Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, mut observer: O) -> LocalSubscription
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    for v in self.0 {
      if observer.is_closed() {
        return LocalSubscription::default();
      }
      observer.next(v);
    }
    if !observer.is_closed() {
      observer.complete();
    }
    LocalSubscription::default()
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn from_range() {
    let hit_count = Rc::new(RefCell::new(0));
    let completed = Rc::new(RefCell::new(false));
    let c_hit = hit_count.clone();
    let c_completed = completed.clone();
    observable::from_iter(0..100).subscribe_all(
      move |_| *c_hit.borrow_mut() += 1,
      |_| {},
      move || *c_completed.borrow_mut() = true,
    );

    assert_eq!(*hit_count.borrow(), 100);
    assert!(*completed.borrow());
  }

  #[test]
  fn of_single() {
    let value = Rc::new(RefCell::new(0));
    let c_value = value.clone();
    observable::of(100).subscribe(move |v| *c_value.borrow_mut() = v);
    assert_eq!(*value.borrow(), 100);
  }
}
