use std::{
  cell::{Ref, RefCell, RefMut},
  rc::Rc,
};

/// Shared, mutable, single-thread cell used to hand one downstream observer
/// to several upstream owners.
pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Default> Default for MutRc<T> {
  fn default() -> Self { Self::own(T::default()) }
}

impl<T> MutRc<Option<T>> {
  /// Takes the inner value out, leaving `None` behind.
  #[inline]
  pub fn take(&self) -> Option<T> { self.0.borrow_mut().take() }

  #[inline]
  pub fn is_none(&self) -> bool { self.0.borrow().is_none() }
}
