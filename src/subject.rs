use std::{
  cell::RefCell,
  rc::{Rc, Weak},
};

use smallvec::SmallVec;

use crate::{
  observable::Observable,
  observer::{BoxedObserver, Observer},
  subscription::{LocalSubscription, SubscriptionLike},
};

mod behavior_subject;
pub use behavior_subject::LocalBehaviorSubject;

/// Hot, multicast observable that is also an observer.
///
/// # Re-Entrancy Policy
///
/// - Emissions (`next`/`error`/`complete`) are not re-entrant. Emitting into a
///   subject from inside one of its own callbacks panics.
/// - Subscribing inside a callback is allowed. The new observer does not
///   receive the emission in progress, it is attached once that emission
///   finishes.
/// - Unsubscribing inside a callback is allowed. The observer is detached once
///   the emission in progress finishes.
pub struct LocalSubject<Item, Err> {
  state: Rc<RefCell<SubjectState<Item, Err>>>,
}

struct SubjectState<Item, Err> {
  observers: Observers<Item, Err>,
  pending: Observers<Item, Err>,
  emitting: bool,
  stopped: bool,
  next_id: usize,
}

type Observers<Item, Err> = SmallVec<[(usize, BoxedObserver<Item, Err>); 2]>;

impl<Item, Err> SubjectState<Item, Err> {
  fn remove(&mut self, id: usize) {
    self.observers.retain(|(i, _)| *i != id);
    self.pending.retain(|(i, _)| *i != id);
  }

  /// Ends an emission: puts the taken list back, drops finished observers and
  /// attaches the ones subscribed meanwhile.
  fn restore(&mut self, mut observers: Observers<Item, Err>) {
    self.emitting = false;
    observers.retain(|(_, o)| !o.is_closed());
    observers.extend(self.pending.drain(..));
    self.observers = observers;
  }

  fn begin_emit(&mut self) -> Observers<Item, Err> {
    assert!(
      !self.emitting,
      "re-entrant emission: a subject was asked to emit from inside one of its own callbacks"
    );
    self.emitting = true;
    std::mem::take(&mut self.observers)
  }
}

impl<Item, Err> Clone for LocalSubject<Item, Err> {
  fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

impl<Item, Err> Default for LocalSubject<Item, Err> {
  fn default() -> Self {
    Self {
      state: Rc::new(RefCell::new(SubjectState {
        observers: SmallVec::new(),
        pending: SmallVec::new(),
        emitting: false,
        stopped: false,
        next_id: 0,
      })),
    }
  }
}

impl<Item, Err> LocalSubject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Number of attached observers, including ones waiting for an emission to
  /// finish.
  pub fn subscriber_count(&self) -> usize {
    let state = self.state.borrow();
    state.observers.len() + state.pending.len()
  }

  /// Takes every observer out for a terminal notification.
  fn drain_for_stop(&self) -> Option<Observers<Item, Err>> {
    let mut state = self.state.borrow_mut();
    if state.stopped {
      return None;
    }
    let mut observers = state.begin_emit();
    observers.extend(state.pending.drain(..));
    state.stopped = true;
    Some(observers)
  }

  fn finish_stop(&self) { self.state.borrow_mut().emitting = false; }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for LocalSubject<Item, Err> {
  fn next(&mut self, value: Item) {
    let mut observers = {
      let mut state = self.state.borrow_mut();
      if state.stopped {
        return;
      }
      state.begin_emit()
    };

    for (_, o) in observers.iter_mut() {
      if !o.is_closed() {
        o.next(value.clone());
      }
    }

    self.state.borrow_mut().restore(observers);
  }

  fn error(self, err: Err) {
    if let Some(observers) = self.drain_for_stop() {
      for (_, o) in observers {
        if !o.is_closed() {
          o.error(err.clone());
        }
      }
      self.finish_stop();
    }
  }

  fn complete(self) {
    if let Some(observers) = self.drain_for_stop() {
      for (_, o) in observers {
        if !o.is_closed() {
          o.complete();
        }
      }
      self.finish_stop();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.state.borrow().stopped }
}

impl<Item: 'static, Err: 'static> Observable for LocalSubject<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> LocalSubscription
  where
    O: Observer<Item, Err> + 'static,
  {
    let mut subscription = LocalSubscription::default();
    let mut state = self.state.borrow_mut();
    if state.stopped {
      drop(state);
      observer.complete();
      subscription.unsubscribe();
      return subscription;
    }

    let id = state.next_id;
    state.next_id += 1;
    let subscriber: BoxedObserver<Item, Err> =
      Box::new(Subscriber { observer: Some(observer), subscription: subscription.clone() });
    if state.emitting {
      state.pending.push((id, subscriber));
    } else {
      state.observers.push((id, subscriber));
    }
    drop(state);

    subscription.add(SubjectSubscription { id, state: Rc::downgrade(&self.state), closed: false });
    subscription
  }
}

/// Observer stored inside a subject, closed as soon as its subscription is.
struct Subscriber<O> {
  observer: Option<O>,
  subscription: LocalSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.subscription.is_closed() {
      self.observer.next(value);
    }
  }

  fn error(mut self, err: Err) {
    if !self.subscription.is_closed() {
      Observer::<Item, Err>::error(self.observer.take(), err);
    }
    self.subscription.unsubscribe();
  }

  fn complete(mut self) {
    if !self.subscription.is_closed() {
      Observer::<Item, Err>::complete(self.observer.take());
    }
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool {
    self.subscription.is_closed() || Observer::<Item, Err>::is_closed(&self.observer)
  }
}

/// Detaches one observer from its subject.
struct SubjectSubscription<Item, Err> {
  id: usize,
  state: Weak<RefCell<SubjectState<Item, Err>>>,
  closed: bool,
}

impl<Item, Err> SubscriptionLike for SubjectSubscription<Item, Err> {
  fn unsubscribe(&mut self) {
    if self.closed {
      return;
    }
    self.closed = true;
    // While the subject is emitting or stopping, the observer is out of the
    // list and is pruned by its closed flag instead.
    if let Some(state) = self.state.upgrade() {
      if let Ok(mut state) = state.try_borrow_mut() {
        state.remove(self.id);
      }
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn multicast() {
    let a = Rc::new(RefCell::new(vec![]));
    let b = Rc::new(RefCell::new(vec![]));
    let mut subject = LocalSubject::<i32, Infallible>::new();
    let c_a = a.clone();
    let c_b = b.clone();
    subject.clone().subscribe(move |v| c_a.borrow_mut().push(v));
    subject.clone().subscribe(move |v| c_b.borrow_mut().push(v));

    subject.next(1);
    subject.next(2);
    assert_eq!(*a.borrow(), vec![1, 2]);
    assert_eq!(*b.borrow(), vec![1, 2]);
  }

  #[test]
  fn unsubscribe_detaches() {
    let hits = Rc::new(RefCell::new(0));
    let mut subject = LocalSubject::<i32, Infallible>::new();
    let c_hits = hits.clone();
    let mut subscription = subject.clone().subscribe(move |_| *c_hits.borrow_mut() += 1);
    subject.next(1);
    subscription.unsubscribe();
    subject.next(2);

    assert_eq!(*hits.borrow(), 1);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn subscribe_inside_callback_skips_in_flight_value() {
    let late = Rc::new(RefCell::new(vec![]));
    let mut subject = LocalSubject::<i32, Infallible>::new();
    let c_subject = subject.clone();
    let c_late = late.clone();
    let attached = Rc::new(RefCell::new(false));
    subject.clone().subscribe(move |_| {
      if !*attached.borrow() {
        *attached.borrow_mut() = true;
        let c_late = c_late.clone();
        c_subject.clone().subscribe(move |v| c_late.borrow_mut().push(v));
      }
    });

    subject.next(1);
    subject.next(2);
    assert_eq!(*late.borrow(), vec![2]);
    assert_eq!(subject.subscriber_count(), 2);
  }

  #[test]
  fn unsubscribe_inside_callback() {
    let hits = Rc::new(RefCell::new(0));
    let mut subject = LocalSubject::<i32, Infallible>::new();
    let holder: Rc<RefCell<Option<LocalSubscription>>> = Rc::new(RefCell::new(None));
    let c_holder = holder.clone();
    let c_hits = hits.clone();
    let subscription = subject.clone().subscribe(move |_| {
      *c_hits.borrow_mut() += 1;
      if let Some(mut s) = c_holder.borrow_mut().take() {
        s.unsubscribe();
      }
    });
    *holder.borrow_mut() = Some(subscription.into_inner());

    subject.next(1);
    subject.next(2);
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn complete_notifies_and_stops() {
    let completed = Rc::new(RefCell::new(0));
    let values = Rc::new(RefCell::new(vec![]));
    let mut subject = LocalSubject::<i32, Infallible>::new();
    let c_completed = completed.clone();
    let c_values = values.clone();
    subject.clone().subscribe_all(
      move |v| c_values.borrow_mut().push(v),
      |_| {},
      move || *c_completed.borrow_mut() += 1,
    );

    subject.next(1);
    subject.clone().complete();
    subject.next(2);
    assert_eq!(*values.borrow(), vec![1]);
    assert_eq!(*completed.borrow(), 1);

    // late subscriber to a finished subject completes right away
    let c_completed = completed.clone();
    subject.clone().subscribe_all(|_| {}, |_| {}, move || *c_completed.borrow_mut() += 1);
    assert_eq!(*completed.borrow(), 2);
  }

  #[test]
  #[should_panic(expected = "re-entrant emission")]
  fn reentrant_next_panics() {
    let mut subject = LocalSubject::<i32, Infallible>::new();
    let c_subject = subject.clone();
    subject.clone().subscribe(move |v| {
      if v == 1 {
        c_subject.clone().next(2);
      }
    });
    subject.next(1);
  }
}
