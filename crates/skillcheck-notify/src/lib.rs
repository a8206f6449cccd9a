//! skillcheck-notify: Result notification delivery.
//!
//! Implements the `Notifier` trait from `skillcheck-core` for an SMS
//! gateway, a logging sink, and a recording mock, plus the configuration
//! that selects between them.

pub mod config;
pub mod logging;
pub mod message;
pub mod mock;
pub mod phone;
pub mod sms;

pub use config::{create_notifier, load_config, load_config_from, NotifierConfig, SkillcheckConfig};
pub use message::compose_message;
pub use phone::format_phone_number;
