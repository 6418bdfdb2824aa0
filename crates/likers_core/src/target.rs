use std::fmt;

use url::Url;

/// Host (or parent domain of the host) every target must point at.
pub const PLATFORM_DOMAIN: &str = "instagram.com";

/// Path segment that precedes a post shortcode: `/p/<shortcode>/`.
const POST_MARKER: &str = "p";

/// Canonical short identifier of a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcode(String);

impl Shortcode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label used to scope per-source counters for this post.
    pub fn source_name(&self) -> String {
        format!("post_{}", self.0)
    }
}

impl fmt::Display for Shortcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid target {url:?}: {reason}")]
pub struct InvalidTarget {
    pub url: String,
    pub reason: InvalidReason,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("not a valid url ({0})")]
    Unparsable(String),
    #[error("host {0:?} is not {domain}", domain = PLATFORM_DOMAIN)]
    ForeignHost(String),
    #[error("no post shortcode in path")]
    NoShortcode,
}

/// Extract the post shortcode from a target URL.
///
/// `https://www.instagram.com/p/<code>/` yields `<code>`. When the path does
/// not start with the post marker, the first `p` segment anywhere in the path
/// is used instead (`/<user>/p/<code>`).
pub fn extract_shortcode(url: &str) -> Result<Shortcode, InvalidTarget> {
    let invalid = |reason| InvalidTarget {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url.trim())
        .map_err(|err| invalid(InvalidReason::Unparsable(err.to_string())))?;
    let host = parsed.host_str().unwrap_or_default();
    if !is_platform_host(host) {
        return Err(invalid(InvalidReason::ForeignHost(host.to_string())));
    }

    let segments: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
    if let [POST_MARKER, code, ..] = segments.as_slice() {
        if !code.is_empty() {
            return Ok(Shortcode((*code).to_string()));
        }
    }

    segments
        .iter()
        .position(|segment| *segment == POST_MARKER)
        .and_then(|idx| segments.get(idx + 1))
        .filter(|code| !code.is_empty())
        .map(|code| Shortcode((*code).to_string()))
        .ok_or_else(|| invalid(InvalidReason::NoShortcode))
}

fn is_platform_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == PLATFORM_DOMAIN
        || host
            .strip_suffix(PLATFORM_DOMAIN)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Split raw target-file content into targets, trimming and dropping blank lines.
pub fn parse_target_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
