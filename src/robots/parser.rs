//! Robots.txt parser implementation
//!
//! Only the wildcard (`User-agent: *`) group is read. `Disallow` paths become
//! prefix rules; `Allow` lines are recognized but carry no exception logic.

use std::collections::BTreeSet;

/// Marker key that opens a user-agent group (matched case-sensitively)
const USER_AGENT_KEY: &str = "User-agent";

/// Disallow rules taken from a site's robots.txt
///
/// The policy is immutable once built. An empty policy allows every path,
/// which is what a crawl gets when robots.txt is missing or unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    disallowed: BTreeSet<String>,
}

impl RobotsPolicy {
    /// Builds a policy from the raw bytes of a robots.txt response
    ///
    /// Bytes that are not valid UTF-8 produce an empty policy.
    pub fn build(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::from_text(text),
            Err(e) => {
                tracing::warn!("robots.txt is not valid UTF-8 ({}), allowing all paths", e);
                Self::allow_all()
            }
        }
    }

    /// Builds a policy from robots.txt text
    ///
    /// # Parsing Rules
    ///
    /// 1. Find the first `User-agent: *` line; if there is none, allow all
    /// 2. `Disallow: <path>` adds the trimmed path (an empty path adds nothing)
    /// 3. `Allow` lines, comments, blank lines and lines without a `:` are skipped
    /// 4. Any other directive (`User-agent`, `Crawl-delay`, `Sitemap`, ...)
    ///    ends the group
    pub fn from_text(text: &str) -> Self {
        let mut lines = text.lines().map(str::trim);

        let found = lines
            .by_ref()
            .any(|line| matches!(split_directive(line), Some((USER_AGENT_KEY, "*"))));
        if !found {
            tracing::warn!("robots.txt has no 'User-agent: *' group, allowing all paths");
            return Self::allow_all();
        }

        let mut disallowed = BTreeSet::new();

        for line in lines {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = split_directive(line) else {
                continue;
            };

            if key.eq_ignore_ascii_case("disallow") {
                if !value.is_empty() {
                    disallowed.insert(value.to_string());
                }
            } else if key.eq_ignore_ascii_case("allow") {
                tracing::trace!("Ignoring robots.txt Allow rule: {}", value);
            } else {
                tracing::trace!("robots.txt group ends at '{}' directive", key);
                break;
            }
        }

        Self { disallowed }
    }

    /// Creates a permissive policy that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks if a path (or raw link) is allowed
    ///
    /// This is a plain string-prefix test: `/private` blocks `/private`,
    /// `/private/a.html` and `/privateer`, and wildcards are not expanded.
    pub fn is_allowed(&self, path: &str) -> bool {
        !self
            .disallowed
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Returns the disallowed path prefixes in sorted order
    pub fn disallowed(&self) -> impl Iterator<Item = &str> {
        self.disallowed.iter().map(String::as_str)
    }

    /// Returns true if the policy places no restriction
    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty()
    }

    /// Returns the number of disallowed prefixes
    pub fn len(&self) -> usize {
        self.disallowed.len()
    }
}

/// Splits `Key: value`, dropping any trailing `# comment` from the value
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let value = value.split('#').next().unwrap_or_default();
    Some((key.trim(), value.trim()))
}
