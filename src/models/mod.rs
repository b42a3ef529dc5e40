pub mod tracker;
pub mod notification;
pub mod user_settings;

pub use tracker::{NewTracker, Tracker, TrackerPatch};
pub use notification::{Notification, PlatformAlert};
pub use user_settings::{EmbedSettings, SettingsPatch, UserSettings};
