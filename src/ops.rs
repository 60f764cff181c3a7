pub mod hide;
pub mod observe_on;
pub mod take_until_event;
