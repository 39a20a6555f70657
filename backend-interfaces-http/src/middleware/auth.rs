use axum::http::HeaderMap;

use backend_application::commands::scan_commands::ScanContext;
use backend_domain::RuntimeConfig;

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Client metadata the scan recorder derives device, language, and
/// location from. The raw forwarded address goes no further than the
/// recorder.
pub fn client_metadata(headers: &HeaderMap) -> ScanContext {
    ScanContext {
        forwarded_for: header_string(headers, "X-Forwarded-For"),
        user_agent: header_string(headers, "User-Agent"),
        accept_language: header_string(headers, "Accept-Language"),
        referrer: header_string(headers, "Referer"),
    }
}
