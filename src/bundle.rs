//! Saved-state container and launch parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One value stored in a [`Bundle`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleValue {
  Bool(bool),
  Int(i64),
  Str(String),
  Bundle(Bundle),
}

/// Key/value container a host persists across screen recreation.
///
/// Keys are kept sorted so two bundles with the same content serialize
/// identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle(BTreeMap<String, BundleValue>);

impl Bundle {
  pub fn new() -> Self { Self::default() }

  #[inline]
  pub fn len(&self) -> usize { self.0.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  #[inline]
  pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }

  pub fn get(&self, key: &str) -> Option<&BundleValue> { self.0.get(key) }

  pub fn put(&mut self, key: impl Into<String>, value: BundleValue) -> Option<BundleValue> {
    self.0.insert(key.into(), value)
  }

  pub fn remove(&mut self, key: &str) -> Option<BundleValue> { self.0.remove(key) }

  pub fn put_bool(&mut self, key: impl Into<String>, v: bool) { self.put(key, BundleValue::Bool(v)); }

  pub fn put_int(&mut self, key: impl Into<String>, v: i64) { self.put(key, BundleValue::Int(v)); }

  pub fn put_string(&mut self, key: impl Into<String>, v: impl Into<String>) {
    self.put(key, BundleValue::Str(v.into()));
  }

  pub fn put_bundle(&mut self, key: impl Into<String>, v: Bundle) {
    self.put(key, BundleValue::Bundle(v));
  }

  pub fn get_bool(&self, key: &str) -> Option<bool> {
    match self.get(key) {
      Some(BundleValue::Bool(v)) => Some(*v),
      _ => None,
    }
  }

  pub fn get_int(&self, key: &str) -> Option<i64> {
    match self.get(key) {
      Some(BundleValue::Int(v)) => Some(*v),
      _ => None,
    }
  }

  pub fn get_string(&self, key: &str) -> Option<&str> {
    match self.get(key) {
      Some(BundleValue::Str(v)) => Some(v),
      _ => None,
    }
  }

  pub fn get_bundle(&self, key: &str) -> Option<&Bundle> {
    match self.get(key) {
      Some(BundleValue::Bundle(v)) => Some(v),
      _ => None,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &BundleValue)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v))
  }
}

/// The sub-bundle stored under `key`, when there is a bundle to look in.
pub fn maybe_bundle<'a>(bundle: Option<&'a Bundle>, key: &str) -> Option<&'a Bundle> {
  bundle.and_then(|b| b.get_bundle(key))
}

/// Launch parameters of a screen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intent {
  pub action: Option<String>,
  #[serde(default)]
  pub extras: Bundle,
}

impl Intent {
  pub fn new(action: impl Into<String>) -> Self {
    Self { action: Some(action.into()), extras: Bundle::default() }
  }

  pub fn with_extras(mut self, extras: Bundle) -> Self {
    self.extras = extras;
    self
  }
}
