//! # Reference channels
//!
//! Small, self-contained subscribers useful for demos and tests.
//!
//! - [`EmailListener`]: renders an email-style message per notification.
//! - [`PushListener`]: renders a push-style message per notification.
//! - [`LogWriter`]: logs every notification through `tracing`.

mod email;
mod log;
mod push;

pub use email::EmailListener;
pub use log::LogWriter;
pub use push::PushListener;
