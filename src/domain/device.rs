//! Device classification from raw `User-Agent` strings.
//!
//! The taxonomy is closed: every input maps to exactly one [`DeviceCategory`].
//! Rules are evaluated in order and the first match wins. iOS is checked before
//! Android because some iOS agents carry tokens that loosely resemble other
//! platforms.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Device family used to pick a redirect destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Ios,
    Android,
    /// Desktop browsers, unknown agents and missing input.
    Other,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Ios => "ios",
            DeviceCategory::Android => "android",
            DeviceCategory::Other => "other",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered match rules, first match wins.
static RULES: LazyLock<Vec<(Regex, DeviceCategory)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)iphone|ipad|ipod").unwrap(),
            DeviceCategory::Ios,
        ),
        (Regex::new(r"(?i)android").unwrap(), DeviceCategory::Android),
    ]
});

/// Classifies a raw client identifying string.
///
/// Total and side-effect free: `None`, empty and unrecognized strings all
/// resolve to [`DeviceCategory::Other`].
///
/// # Examples
///
/// ```
/// use smart_link::domain::device::{DeviceCategory, classify};
///
/// assert_eq!(classify(Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)")), DeviceCategory::Ios);
/// assert_eq!(classify(Some("Mozilla/5.0 (Linux; Android 14)")), DeviceCategory::Android);
/// assert_eq!(classify(None), DeviceCategory::Other);
/// ```
pub fn classify(user_agent: Option<&str>) -> DeviceCategory {
    let Some(ua) = user_agent.filter(|ua| !ua.is_empty()) else {
        return DeviceCategory::Other;
    };

    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(ua))
        .map(|(_, category)| *category)
        .unwrap_or(DeviceCategory::Other)
}
