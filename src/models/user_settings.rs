use serde::{Deserialize, Serialize};

pub const DEFAULT_CHECK_FREQUENCY: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub push_notifications: bool,
    pub sound_alerts: bool,
    // minutes
    pub check_frequency: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            push_notifications: true,
            sound_alerts: false,
            check_frequency: DEFAULT_CHECK_FREQUENCY,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub push_notifications: Option<bool>,
    pub sound_alerts: Option<bool>,
    pub check_frequency: Option<u32>,
}

impl UserSettings {
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.push_notifications {
            self.push_notifications = v;
        }
        if let Some(v) = patch.sound_alerts {
            self.sound_alerts = v;
        }
        if let Some(v) = patch.check_frequency {
            self.check_frequency = v.max(1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedSettings {
    #[serde(default)]
    pub custom_css: String,
    pub default_height: String,
    pub default_theme: String,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            custom_css: String::new(),
            default_height: "600px".to_string(),
            default_theme: "light".to_string(),
        }
    }
}
