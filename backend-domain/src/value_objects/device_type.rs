// Device type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    MOBILE,
    TABLET,
    DESKTOP,
    UNKNOWN,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::MOBILE => "MOBILE",
            DeviceType::TABLET => "TABLET",
            DeviceType::DESKTOP => "DESKTOP",
            DeviceType::UNKNOWN => "UNKNOWN",
        }
    }
}

impl From<&str> for DeviceType {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MOBILE" => DeviceType::MOBILE,
            "TABLET" => DeviceType::TABLET,
            "DESKTOP" => DeviceType::DESKTOP,
            _ => DeviceType::UNKNOWN,
        }
    }
}
