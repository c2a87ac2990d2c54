//! Selection and repetition directives
//!
//! Directives are structured metadata attached to a case. The tags embedded
//! in qualified names (`#only`, `#skip`, `#always`, `#times=N`) are read by
//! [`Directives::parse`] and merged with whatever was set at registration.

use serde::Serialize;
use std::fmt;

pub const ONLY_TAG: &str = "#only";
pub const SKIP_TAG: &str = "#skip";
pub const ALWAYS_TAG: &str = "#always";
pub const TIMES_TAG: &str = "#times=";

/// Directive metadata for a single case
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Directives {
    /// Run exclusively, together with other `only` and `always` cases
    pub only: bool,
    /// Never run
    pub skip: bool,
    /// Run even when an `only` filter is active
    pub always: bool,
    /// Number of sequential invocations, at least 1
    pub times: u32,
}

impl Default for Directives {
    fn default() -> Self {
        Self {
            only: false,
            skip: false,
            always: false,
            times: 1,
        }
    }
}

impl Directives {
    /// Parse the tags embedded in a qualified name
    ///
    /// Tags match by plain substring containment, so `"a#skipper"` is a skip.
    /// `#times=` takes the first occurrence followed by digits; zero or an
    /// unparseable count falls back to a single run.
    pub fn parse(name: &str) -> Self {
        Self {
            only: name.contains(ONLY_TAG),
            skip: name.contains(SKIP_TAG),
            always: name.contains(ALWAYS_TAG),
            times: parse_times(name).unwrap_or(1),
        }
    }

    /// Combine two directive sets; flags are OR-ed, the larger count wins
    pub fn merge(self, other: Directives) -> Self {
        Self {
            only: self.only || other.only,
            skip: self.skip || other.skip,
            always: self.always || other.always,
            times: self.times.max(other.times).max(1),
        }
    }

    /// Whether any flag or a repeat count is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_times(name: &str) -> Option<u32> {
    name.match_indices(TIMES_TAG)
        .find_map(|(pos, tag)| {
            let rest = &name[pos + tag.len()..];
            let len = rest.bytes().take_while(u8::is_ascii_digit).count();
            (len > 0).then(|| &rest[..len])
        })
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|times| *times > 0)
}

impl fmt::Display for Directives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags = Vec::new();
        if self.only {
            tags.push("only".to_string());
        }
        if self.skip {
            tags.push("skip".to_string());
        }
        if self.always {
            tags.push("always".to_string());
        }
        if self.times > 1 {
            tags.push(format!("times={}", self.times));
        }
        write!(f, "{}", tags.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        let directives = Directives::parse("nested name");
        assert!(directives.is_empty());
        assert_eq!(directives.times, 1);
    }

    #[test]
    fn test_parse_flags_by_substring() {
        let directives = Directives::parse("a #only b #skipped #always");
        assert!(directives.only);
        assert!(directives.skip);
        assert!(directives.always);
    }

    #[test]
    fn test_parse_times() {
        assert_eq!(Directives::parse("bench #times=99999").times, 99999);
        assert_eq!(Directives::parse("x #times=3 #times=7").times, 3);
        assert_eq!(Directives::parse("x #times=abc #times=4").times, 4);
        assert_eq!(Directives::parse("x #times=12abc").times, 12);
    }

    #[test]
    fn test_parse_times_fallback() {
        assert_eq!(Directives::parse("x #times=").times, 1);
        assert_eq!(Directives::parse("x #times=0").times, 1);
        assert_eq!(Directives::parse("x #times=-2").times, 1);
        assert_eq!(Directives::parse("x #times=99999999999999").times, 1);
    }

    #[test]
    fn test_merge() {
        let registered = Directives {
            always: true,
            times: 2,
            ..Directives::default()
        };
        let merged = registered.merge(Directives::parse("x #only #times=5"));
        assert!(merged.only);
        assert!(merged.always);
        assert!(!merged.skip);
        assert_eq!(merged.times, 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Directives::parse("x #skip #times=3").to_string(), "skip,times=3");
        assert_eq!(Directives::default().to_string(), "");
    }
}
