pub mod notification;

pub use notification::{Notifier, SilentNotifier, TracingNotifier};
