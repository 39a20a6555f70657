// User-agent and language classification
// An ordered list of classifier strategies; the first non-empty answer wins.

use crate::value_objects::DeviceType;

type DeviceClassifier = fn(&str) -> Option<DeviceType>;

const DEVICE_CLASSIFIERS: &[DeviceClassifier] = &[platform_segment, keyword_match];

pub fn classify_device(user_agent: &str) -> DeviceType {
    let ua = user_agent.trim();
    if ua.is_empty() {
        return DeviceType::UNKNOWN;
    }
    for classifier in DEVICE_CLASSIFIERS {
        if let Some(device) = classifier(ua) {
            return device;
        }
    }
    DeviceType::UNKNOWN
}

/// Reads the parenthesized platform segment of a conventional user agent,
/// e.g. `Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 ...)`.
fn platform_segment(ua: &str) -> Option<DeviceType> {
    let open = ua.find('(')?;
    let close = ua[open..].find(')')? + open;
    let segment = ua[open + 1..close].to_lowercase();

    if segment.contains("ipad") {
        return Some(DeviceType::TABLET);
    }
    if segment.contains("iphone") || segment.contains("ipod") {
        return Some(DeviceType::MOBILE);
    }
    if segment.contains("android") {
        // Android phones advertise "Mobile"; tablets do not.
        let rest = ua.to_lowercase();
        return Some(if rest.contains("mobile") {
            DeviceType::MOBILE
        } else {
            DeviceType::TABLET
        });
    }
    if segment.contains("windows nt")
        || segment.contains("macintosh")
        || segment.contains("x11")
        || segment.contains("cros")
    {
        return Some(DeviceType::DESKTOP);
    }
    None
}

const TABLET_TOKENS: &[&str] = &["tablet", "kindle", "silk", "playbook"];
const MOBILE_TOKENS: &[&str] = &[
    "mobile",
    "phone",
    "blackberry",
    "opera mini",
    "windows phone",
    "webos",
    "symbian",
];
const DESKTOP_TOKENS: &[&str] = &["windows", "macintosh", "mac os", "linux", "freebsd"];

/// Case-insensitive substring fallback for user agents the segment reader
/// cannot place.
fn keyword_match(ua: &str) -> Option<DeviceType> {
    let lower = ua.to_lowercase();
    if TABLET_TOKENS.iter().any(|token| lower.contains(token)) {
        return Some(DeviceType::TABLET);
    }
    if MOBILE_TOKENS.iter().any(|token| lower.contains(token)) {
        return Some(DeviceType::MOBILE);
    }
    if DESKTOP_TOKENS.iter().any(|token| lower.contains(token)) {
        return Some(DeviceType::DESKTOP);
    }
    None
}

/// Best-effort OS name. Empty string when nothing matches; consumers
/// default the empty string to "Unknown" at display time.
pub fn detect_os(user_agent: &str) -> String {
    let lower = user_agent.to_lowercase();
    if lower.is_empty() {
        return String::new();
    }
    if lower.contains("windows phone") {
        return "Windows Phone".to_string();
    }
    if lower.contains("android") {
        return "Android".to_string();
    }
    if lower.contains("iphone") || lower.contains("ipad") || lower.contains("ipod") {
        return "iOS".to_string();
    }
    if lower.contains("windows nt") || lower.contains("windows") {
        return "Windows".to_string();
    }
    if lower.contains("mac os") || lower.contains("macintosh") {
        return "macOS".to_string();
    }
    if lower.contains("cros") {
        return "ChromeOS".to_string();
    }
    if lower.contains("linux") || lower.contains("x11") {
        return "Linux".to_string();
    }
    String::new()
}

/// First tag of an Accept-Language header, lowercased, quality weights
/// stripped. Empty input stays empty.
pub fn primary_language(accept_language: &str) -> String {
    accept_language
        .split(',')
        .next()
        .map(|tag| tag.split(';').next().unwrap_or("").trim().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
    const IPAD: &str =
        "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
    const ANDROID_PHONE: &str =
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str =
        "Mozilla/5.0 (Linux; Android 13; SM-X200) AppleWebKit/537.36 Chrome/119.0 Safari/537.36";
    const WINDOWS: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

    #[test]
    fn platform_segment_classifies_common_agents() {
        assert_eq!(classify_device(IPHONE), DeviceType::MOBILE);
        assert_eq!(classify_device(IPAD), DeviceType::TABLET);
        assert_eq!(classify_device(ANDROID_PHONE), DeviceType::MOBILE);
        assert_eq!(classify_device(ANDROID_TABLET), DeviceType::TABLET);
        assert_eq!(classify_device(WINDOWS), DeviceType::DESKTOP);
    }

    #[test]
    fn keyword_fallback_handles_unstructured_agents() {
        assert_eq!(classify_device("BlackBerry9700/5.0"), DeviceType::MOBILE);
        assert_eq!(classify_device("Kindle Fire HD"), DeviceType::TABLET);
    }

    #[test]
    fn unclassifiable_agents_are_unknown() {
        assert_eq!(classify_device(""), DeviceType::UNKNOWN);
        assert_eq!(classify_device("curl/8.4.0"), DeviceType::UNKNOWN);
    }

    #[test]
    fn os_detection() {
        assert_eq!(detect_os(IPHONE), "iOS");
        assert_eq!(detect_os(ANDROID_PHONE), "Android");
        assert_eq!(detect_os(WINDOWS), "Windows");
        assert_eq!(detect_os("curl/8.4.0"), "");
    }

    #[test]
    fn accept_language_takes_first_tag() {
        assert_eq!(primary_language("cs-CZ,cs;q=0.9,en;q=0.8"), "cs-cz");
        assert_eq!(primary_language("de"), "de");
        assert_eq!(primary_language(""), "");
    }
}
