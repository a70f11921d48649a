//! Background task execution engine
//!
//! [`BackgroundExecutor`] launches opaque units of work on their own
//! threads, tracks them in a [`TaskRegistry`], signals completions through
//! a condition variable for blocking polls, and emits one
//! [`crate::schema::NotificationEvent`] per terminal transition onto the
//! [`NotificationBus`]. Cancellation is cooperative through
//! [`CancellationToken`]; see the executor docs for the exact contract.

pub mod cancel;
pub mod error;
pub mod executor;
pub mod notify;
pub mod registry;

pub use cancel::CancellationToken;
pub use error::TaskError;
pub use executor::BackgroundExecutor;
pub use notify::NotificationBus;
pub use registry::TaskRegistry;
