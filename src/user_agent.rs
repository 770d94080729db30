//! Shared User-Agent string for shelf, catalog and mirror HTTP traffic.
//!
//! The shelf site rejects default client identifiers, so every request goes out
//! with a desktop browser User-Agent.

/// Browser User-Agent sent on every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default User-Agent for all outbound requests.
#[must_use]
pub(crate) fn default_user_agent() -> &'static str {
    BROWSER_USER_AGENT
}
