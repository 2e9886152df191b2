//! Registry entry type

use serde::{Deserialize, Deserializer, Serialize};

/// A tracked library as stored in the registry file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    /// Last version observed upstream
    pub version: String,
    pub url: String,
    /// Pattern with a named capture group `Version`
    pub regex: String,
    /// Script under the hooks directory run after an update
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_hook"
    )]
    pub hook: Option<String>,
}

impl Library {
    pub fn new(name: &str, version: &str, url: &str, regex: &str, hook: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            url: url.to_string(),
            regex: regex.to_string(),
            hook: hook.map(str::to_string),
        }
    }

    pub fn set_version(&mut self, version: &str) {
        self.version = version.to_string();
    }
}

// Older registries always carry `"hook": ""`
fn deserialize_hook<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let hook = Option::<String>::deserialize(deserializer)?;
    Ok(hook.filter(|h| !h.trim().is_empty()))
}
