//! # Event subscribers.
//!
//! - [`Subscribe`] trait for custom handlers,
//! - [`SubscriberSet`] per-subscriber queues with panic isolation,
//! - [`LogWriter`] built-in subscriber (feature `logging`).

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
pub(crate) use subscriber_set::panic_message;
