use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Cookie carrying the session token on authenticated requests
pub const ACCESS_TOKEN_COOKIE: &str = "X-Access-Token";

/// Cookie carrying the refresh token on authenticated requests
pub const REFRESH_TOKEN_COOKIE: &str = "X-Access-Refresh-Token";

/// Tokens issued by a successful sign-in.
///
/// The server's expiry hint is kept but never enforced: a session is used for
/// exactly one request right after it is created.
#[derive(Clone)]
pub struct Session {
    pub session_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds as declared by the server
    pub expires_in: Option<i64>,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(session_token: String, refresh_token: String, expires_in: Option<i64>) -> Self {
        Self {
            session_token,
            refresh_token,
            expires_in,
            issued_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .map(|expiry| Utc::now() > expiry)
            .unwrap_or(false)
    }

    /// Value for the `Cookie` header of authenticated requests.
    /// Empty tokens are left out; `None` if both are empty. Token values are
    /// passed through `sanitize_cookie_value`.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = [
            (ACCESS_TOKEN_COOKIE, &self.session_token),
            (REFRESH_TOKEN_COOKIE, &self.refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}={}", name, sanitize_cookie_value(value)))
        .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}

/// Drop bytes not allowed in a cookie value (controls, non-ASCII, `"`, `;`,
/// `\`) and quote the result if it contains a space or comma.
fn sanitize_cookie_value(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|&c| matches!(c, ' '..='~') && !matches!(c, '"' | ';' | '\\'))
        .collect();

    if cleaned.contains([' ', ',']) {
        format!("\"{}\"", cleaned)
    } else {
        cleaned
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
