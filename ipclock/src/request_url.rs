pub const IP_PLACEHOLDER: &str = "{ip}";

/// Builds the request URL from a configured base and an optional target IP.
///
/// A base containing `{ip}` is treated as a template; otherwise the IP is
/// appended as the last path segment. At most one trailing `/` is ever
/// trimmed.
pub fn resolve_url(base: &str, ip: Option<&str>) -> String {
    let has_placeholder = base.contains(IP_PLACEHOLDER);
    match ip {
        Some(ip) if has_placeholder => {
            let encoded: String = url::form_urlencoded::byte_serialize(ip.as_bytes()).collect();
            base.replace(IP_PLACEHOLDER, &encoded)
        }
        Some(ip) => format!("{}/{}", trim_one_slash(base), ip),
        None if has_placeholder => {
            let url = base.replace(IP_PLACEHOLDER, "");
            trim_one_slash(&url).to_string()
        }
        None => base.to_string(),
    }
}

fn trim_one_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}
