use serde::{Deserialize, Serialize};

use crate::bundle::Intent;

/// Result code of a screen that finished normally.
pub const RESULT_OK: i32 = -1;
/// Result code of a screen that was backed out of or failed.
pub const RESULT_CANCELED: i32 = 0;
/// First result code free for application use.
pub const RESULT_FIRST_USER: i32 = 1;

/// What a screen launched for a result handed back: the request code it was
/// launched with, its result code and an optional payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityResult {
  request_code: i32,
  result_code: i32,
  intent: Option<Intent>,
}

impl ActivityResult {
  pub fn create(request_code: i32, result_code: i32, intent: Option<Intent>) -> Self {
    Self { request_code, result_code, intent }
  }

  pub fn builder() -> ActivityResultBuilder { ActivityResultBuilder::default() }

  pub fn to_builder(&self) -> ActivityResultBuilder {
    ActivityResultBuilder {
      request_code: self.request_code,
      result_code: self.result_code,
      intent: self.intent.clone(),
    }
  }

  #[inline]
  pub fn request_code(&self) -> i32 { self.request_code }

  #[inline]
  pub fn result_code(&self) -> i32 { self.result_code }

  #[inline]
  pub fn intent(&self) -> Option<&Intent> { self.intent.as_ref() }

  #[inline]
  pub fn is_canceled(&self) -> bool { self.result_code == RESULT_CANCELED }

  #[inline]
  pub fn is_ok(&self) -> bool { self.result_code == RESULT_OK }

  #[inline]
  pub fn is_request_code(&self, v: i32) -> bool { self.request_code == v }
}

/// Builder for [`ActivityResult`]. Unset codes default to `0`, i.e. a
/// canceled result.
#[derive(Clone, Debug, Default)]
pub struct ActivityResultBuilder {
  request_code: i32,
  result_code: i32,
  intent: Option<Intent>,
}

impl ActivityResultBuilder {
  pub fn request_code(mut self, v: i32) -> Self {
    self.request_code = v;
    self
  }

  pub fn result_code(mut self, v: i32) -> Self {
    self.result_code = v;
    self
  }

  pub fn intent(mut self, v: Option<Intent>) -> Self {
    self.intent = v;
    self
  }

  pub fn build(self) -> ActivityResult {
    ActivityResult::create(self.request_code, self.result_code, self.intent)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::bundle::Bundle;

  #[test]
  fn ok_result() {
    let result = ActivityResult::create(42, RESULT_OK, Some(Intent::new("picked")));
    assert!(result.is_ok());
    assert!(!result.is_canceled());
    assert!(result.is_request_code(42));
    assert!(!result.is_request_code(7));
    assert_eq!(result.intent().and_then(|i| i.action.as_deref()), Some("picked"));
  }

  #[test]
  fn canceled_result() {
    let result = ActivityResult::create(7, RESULT_CANCELED, None);
    assert!(result.is_canceled());
    assert!(!result.is_ok());
    assert_eq!(result.intent(), None);
  }

  #[test]
  fn user_code_is_neither() {
    let result = ActivityResult::create(1, RESULT_FIRST_USER, None);
    assert!(!result.is_ok());
    assert!(!result.is_canceled());
  }

  #[test]
  fn builder_matches_create() {
    let built = ActivityResult::builder().request_code(3).result_code(RESULT_OK).build();
    assert_eq!(built, ActivityResult::create(3, RESULT_OK, None));

    let changed = built.to_builder().result_code(RESULT_CANCELED).build();
    assert!(changed.is_canceled());
    assert!(changed.is_request_code(3));
  }

  #[test]
  fn survives_json() {
    let mut extras = Bundle::new();
    extras.put_int("project_id", 9);
    let result = ActivityResult::create(5, RESULT_OK, Some(Intent::new("done").with_extras(extras)));
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(serde_json::from_str::<ActivityResult>(&json).unwrap(), result);
  }
}
