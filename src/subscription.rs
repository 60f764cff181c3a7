use smallvec::SmallVec;
use std::{
  any::Any,
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

/// Subscription returns from `Observable::actual_subscribe` to allow
/// unsubscribing.
pub trait SubscriptionLike {
  /// This allows deregistering a stream before it has finished receiving all
  /// events (i.e. before complete is called). Unsubscribing twice is a no-op.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

impl Debug for Box<dyn SubscriptionLike> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Box<dyn SubscriptionLike>")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// Composite, reference-counted subscription.
///
/// Every clone shares the same teardown list. Unsubscribing any clone tears
/// down all members; adding to a closed subscription unsubscribes the new
/// member immediately. A screen uses one of these as its disposable-work
/// registry.
#[derive(Clone, Debug, Default)]
pub struct LocalSubscription(Rc<RefCell<Inner>>);

impl LocalSubscription {
  pub fn add<S: SubscriptionLike + 'static>(&self, subscription: S) {
    if self.is_same(&subscription) {
      return;
    }
    let mut subscription = subscription;
    let closed = self.0.borrow().closed;
    if closed {
      subscription.unsubscribe();
    } else {
      self.0.borrow_mut().add(Box::new(subscription));
    }
  }

  fn is_same(&self, other: &dyn Any) -> bool {
    other
      .downcast_ref::<Self>()
      .is_some_and(|other| self.ptr_eq(other))
  }

  /// Number of live members.
  pub fn teardown_size(&self) -> usize { self.0.borrow().teardown.len() }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl SubscriptionLike for LocalSubscription {
  fn unsubscribe(&mut self) {
    // Members are torn down outside the borrow, a member may hold a clone of
    // this subscription.
    let teardown = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for mut v in teardown {
      v.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[Box<dyn SubscriptionLike>; 1]>,
}

impl Debug for Inner {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Inner")
      .field("closed", &self.closed)
      .field("teardown_count", &self.teardown.len())
      .finish()
  }
}

impl Inner {
  fn add(&mut self, v: Box<dyn SubscriptionLike>) {
    self.teardown.retain(|v| !v.is_closed());
    self.teardown.push(v);
  }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// A subscription that runs a closure once when unsubscribed.
pub struct Teardown<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Teardown<F> {
  pub fn new(f: F) -> Self { Teardown(Some(f)) }
}

impl<F: FnOnce()> SubscriptionLike for Teardown<F> {
  fn unsubscribe(&mut self) {
    if let Some(f) = self.0.take() {
      f()
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_none() }
}

/// Handle returned by `subscribe`.
pub struct SubscriptionWrapper<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionWrapper<T> {
  /// Consumes this wrapper and returns the underlying subscription.
  pub fn into_inner(self) -> T { self.0 }
}

impl<T: SubscriptionLike> SubscriptionLike for SubscriptionWrapper<T> {
  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
  #[inline]
  fn unsubscribe(&mut self) { self.0.unsubscribe() }
}
