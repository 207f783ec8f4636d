//! Gateway endpoint helpers
//!
//! Users paste gateway addresses from all kinds of places: bare
//! `host:port` strings, REST API docs, chat messages with trailing
//! punctuation. [`sanitize`] repairs those best-effort and is idempotent,
//! so callers may re-run it on already-clean input. [`connect_url`]
//! attaches the auth credential as query parameters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Strict `protocol://host[:port][/path]` shape.
static STRICT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(http|https|ws|wss)://[\w.-]+(:\d+)?(/.*)?$").expect("valid strict url regex")
});

/// First embedded URL inside arbitrary text (recovers concatenated pastes).
static EMBEDDED_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(http|https|ws|wss)://[\w.-]+(:\d+)?(/[^\s]*)?").expect("valid embedded url regex")
});

/// Foreign REST completion endpoint users paste from unrelated API docs.
const COMPLETIONS_SUFFIX: &str = "/v1/chat/completions";

/// Trailing slashes are only stripped above this length, so a minimal
/// `http://x/` style input is never reduced to nonsense.
const MIN_STRIP_LEN: usize = 10;

/// Normalize a raw user-typed gateway address.
///
/// Rules, in order: infer a protocol when missing (loopback hosts get the
/// plaintext one), extract the first embedded URL when the whole string is
/// not one, strip trailing slashes and a foreign REST completion suffix.
/// Never fails; unrepairable input is returned minimally cleaned.
///
/// Idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let mut cleaned = raw.trim().to_string();

    if !has_protocol(&cleaned) {
        if is_loopback_host(&cleaned) {
            cleaned = format!("http://{cleaned}");
        } else {
            cleaned = format!("https://{cleaned}");
        }
    }

    if !STRICT_URL.is_match(&cleaned) {
        if let Some(found) = EMBEDDED_URL.find(&cleaned) {
            cleaned = found.as_str().to_string();
        }
    }

    // Slash stripping can expose the completion suffix and vice versa,
    // so both run to a fixpoint; otherwise repeated calls would keep
    // peeling layers and break idempotence.
    loop {
        let len_before = cleaned.len();
        while cleaned.len() > MIN_STRIP_LEN && cleaned.ends_with('/') {
            cleaned.pop();
        }
        if let Some(stripped) = cleaned.strip_suffix(COMPLETIONS_SUFFIX) {
            cleaned = stripped.to_string();
        }
        if cleaned.len() == len_before {
            break;
        }
    }

    cleaned
}

fn has_protocol(address: &str) -> bool {
    ["http://", "https://", "ws://", "wss://"]
        .iter()
        .any(|prefix| address.starts_with(prefix))
}

/// Whether the address names a loopback-looking host.
pub fn is_loopback_host(address: &str) -> bool {
    address.contains("localhost") || address.contains("127.0.0.1")
}

/// Query parameter conventions for passing the auth credential.
///
/// Gateways observed in the wild read different fields, so the default is
/// to attach all of them, populated identically from the same credential.
/// This redundancy is a deliberate compatibility shim, not a protocol
/// requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    /// Raw token: `token=<credential>`
    Token,
    /// OAuth-style: `access_token=<credential>`
    AccessToken,
    /// Header-style: `authorization=Bearer <credential>`
    AuthorizationBearer,
}

impl AuthField {
    /// The full compatibility set, in attachment order.
    pub const ALL: [AuthField; 3] = [
        AuthField::Token,
        AuthField::AccessToken,
        AuthField::AuthorizationBearer,
    ];

    fn key(&self) -> &'static str {
        match self {
            AuthField::Token => "token",
            AuthField::AccessToken => "access_token",
            AuthField::AuthorizationBearer => "authorization",
        }
    }

    fn value(&self, token: &str) -> String {
        match self {
            AuthField::Token | AuthField::AccessToken => token.to_string(),
            AuthField::AuthorizationBearer => format!("Bearer {token}"),
        }
    }
}

/// Build the connection URL, attaching the credential as query parameters.
///
/// An empty token attaches nothing at all, so unauthenticated local
/// gateways never see an empty credential field. An existing query string
/// in `base` is extended with `&` rather than a second `?`.
pub fn connect_url(base: &str, token: &str, fields: &[AuthField]) -> String {
    if token.is_empty() || fields.is_empty() {
        return base.to_string();
    }

    let mut url = String::from(base);
    let mut separator = if base.contains('?') { '&' } else { '?' };
    for field in fields {
        url.push(separator);
        separator = '&';
        url.push_str(field.key());
        url.push('=');
        url.push_str(&query_encode(&field.value(token)));
    }
    url
}

/// Percent-encode a query component.
///
/// Conservative: everything outside the unreserved set is escaped.
fn query_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push_str(&format!("{byte:02X}"));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_localhost_gets_plaintext_protocol() {
        assert_eq!(sanitize("localhost:18789"), "http://localhost:18789");
        assert_eq!(sanitize("127.0.0.1:18789"), "http://127.0.0.1:18789");
    }

    #[test]
    fn test_bare_remote_host_gets_encrypted_protocol() {
        assert_eq!(sanitize("gateway.example.com"), "https://gateway.example.com");
    }

    #[test]
    fn test_strips_completion_endpoint_suffix() {
        assert_eq!(
            sanitize("https://example.com/v1/chat/completions"),
            "https://example.com"
        );
    }

    #[test]
    fn test_strips_completion_endpoint_suffix_with_trailing_slash() {
        // The slash must not shield the suffix on the first pass.
        assert_eq!(
            sanitize("https://example.com/v1/chat/completions/"),
            "https://example.com"
        );
    }

    #[test]
    fn test_recovers_embedded_url_from_bad_paste() {
        assert_eq!(
            sanitize("https://example.com:8443/ws copied from the docs"),
            "https://example.com:8443/ws"
        );
    }

    #[test]
    fn test_strips_single_trailing_slash() {
        assert_eq!(sanitize("https://example.com/"), "https://example.com");
    }

    #[test]
    fn test_short_input_keeps_trailing_slash() {
        // Below the strip threshold, the slash survives.
        assert_eq!(sanitize("ws://a/"), "ws://a/");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "localhost:18789",
            "gateway.example.com",
            "https://example.com/v1/chat/completions",
            "https://example.com/v1/chat/completions/",
            "https://example.com//",
            "junk https://example.com/ws junk",
            "wss://gateway.example.com/ws/",
            "",
            "   ",
            "not a url at all",
        ] {
            let once = sanitize(input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "sanitize not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(sanitize("  ws://localhost:18789/ws  "), "ws://localhost:18789/ws");
    }

    #[test]
    fn test_connect_url_attaches_all_fields() {
        let url = connect_url("ws://localhost:18789/ws", "s3cret", &AuthField::ALL);
        assert_eq!(
            url,
            "ws://localhost:18789/ws?token=s3cret&access_token=s3cret&authorization=Bearer%20s3cret"
        );
    }

    #[test]
    fn test_connect_url_respects_existing_query() {
        let url = connect_url("ws://host/ws?room=1", "t", &[AuthField::Token]);
        assert_eq!(url, "ws://host/ws?room=1&token=t");
    }

    #[test]
    fn test_connect_url_empty_token_attaches_nothing() {
        let url = connect_url("ws://localhost:18789/ws", "", &AuthField::ALL);
        assert_eq!(url, "ws://localhost:18789/ws");
        assert!(!url.contains("token"));
    }

    #[test]
    fn test_query_encoding_escapes_reserved_bytes() {
        let url = connect_url("ws://h/ws", "a&b=c", &[AuthField::Token]);
        assert_eq!(url, "ws://h/ws?token=a%26b%3Dc");
    }
}
