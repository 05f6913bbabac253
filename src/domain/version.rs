//! PEP 440 version identifiers
//!
//! Parses and orders versions such as `1.2.3`, `2!1.0`, `1.0rc1`,
//! `1.0.post2`, `1.0.dev0` and `1.0+ubuntu.1`. Alternate spellings
//! (`1.0-alpha1`, `1.0-1`, `v1.0`) are accepted and normalized.

use crate::error::VersionParseError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?P<pre>[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>[0-9]+)?)?
        (?P<post>(?:-(?P<post_n1>[0-9]+))|(?:[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?))?
        (?P<dev>[-_.]?dev[-_.]?(?P<dev_n>[0-9]+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        \s*$",
    )
    .unwrap()
});

/// Pre-release phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleaseKind {
    /// `a`, `alpha`
    Alpha,
    /// `b`, `beta`
    Beta,
    /// `rc`, `c`, `pre`, `preview`
    Rc,
}

impl PreReleaseKind {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreReleaseKind::Alpha,
            "b" | "beta" => PreReleaseKind::Beta,
            _ => PreReleaseKind::Rc,
        }
    }

    /// Normalized label
    pub fn label(&self) -> &'static str {
        match self {
            PreReleaseKind::Alpha => "a",
            PreReleaseKind::Beta => "b",
            PreReleaseKind::Rc => "rc",
        }
    }
}

/// Pre-release marker, e.g. `rc1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreRelease {
    pub kind: PreReleaseKind,
    pub number: u64,
}

/// One dot-separated piece of a local version label.
/// Alphanumeric segments sort before numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum LocalSegment {
    Text(String),
    Number(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Text(s) => write!(f, "{}", s),
            LocalSegment::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Sort key component with explicit infinities
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Bound<T> {
    Below,
    Value(T),
    Above,
}

/// A parsed PEP 440 version
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<PreRelease>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Vec<LocalSegment>,
}

impl Version {
    /// Parse a version string, returning `None` when it is not valid PEP 440
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Create a plain release version from its segments
    pub fn from_release(release: &[u64]) -> Self {
        Self {
            epoch: 0,
            release: release.to_vec(),
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    /// Version epoch (`N!` prefix), 0 when absent
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Release segments as written (trailing zeros kept)
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Pre-release marker
    pub fn pre(&self) -> Option<PreRelease> {
        self.pre
    }

    /// Post-release number
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    /// Development release number
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// Returns true for pre-releases and development releases
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Returns true for development releases
    pub fn is_devrelease(&self) -> bool {
        self.dev.is_some()
    }

    /// Returns true for post-releases
    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    /// Returns true if a local label (`+...`) is present
    pub fn has_local(&self) -> bool {
        !self.local.is_empty()
    }

    /// Returns true for releases without pre-release or dev markers
    pub fn is_stable(&self) -> bool {
        !self.is_prerelease()
    }

    /// The version without its local label
    pub fn public(&self) -> Version {
        Version {
            local: Vec::new(),
            ..self.clone()
        }
    }

    /// Epoch and release only
    pub fn base_version(&self) -> Version {
        Version {
            epoch: self.epoch,
            ..Version::from_release(&self.release)
        }
    }

    fn trimmed_release(&self) -> &[u64] {
        let mut end = self.release.len();
        while end > 0 && self.release[end - 1] == 0 {
            end -= 1;
        }
        &self.release[..end]
    }

    #[allow(clippy::type_complexity)]
    fn cmp_key(
        &self,
    ) -> (
        u64,
        &[u64],
        Bound<PreRelease>,
        Bound<u64>,
        Bound<u64>,
        Bound<&[LocalSegment]>,
    ) {
        // A bare dev release sorts before every pre-release of the same version
        let pre = match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => Bound::Below,
            (None, _, _) => Bound::Above,
            (Some(pre), _, _) => Bound::Value(pre),
        };
        let post = self.post.map_or(Bound::Below, Bound::Value);
        let dev = self.dev.map_or(Bound::Above, Bound::Value);
        let local = if self.local.is_empty() {
            Bound::Below
        } else {
            Bound::Value(self.local.as_slice())
        };

        (self.epoch, self.trimmed_release(), pre, post, dev, local)
    }
}

fn parse_number(value: &str, input: &str) -> Result<u64, VersionParseError> {
    value
        .parse()
        .map_err(|_| VersionParseError(input.to_string()))
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| VersionParseError(s.to_string()))?;

        let epoch = match caps.name("epoch") {
            Some(m) => parse_number(m.as_str(), s)?,
            None => 0,
        };

        let release = caps
            .name("release")
            .map(|m| m.as_str())
            .unwrap_or_default()
            .split('.')
            .map(|part| parse_number(part, s))
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => Some(PreRelease {
                kind: PreReleaseKind::from_label(label.as_str()),
                number: match caps.name("pre_n") {
                    Some(n) => parse_number(n.as_str(), s)?,
                    None => 0,
                },
            }),
            None => None,
        };

        let post = if let Some(n) = caps.name("post_n1") {
            Some(parse_number(n.as_str(), s)?)
        } else if caps.name("post_l").is_some() {
            match caps.name("post_n2") {
                Some(n) => Some(parse_number(n.as_str(), s)?),
                None => Some(0),
            }
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            match caps.name("dev_n") {
                Some(n) => Some(parse_number(n.as_str(), s)?),
                None => Some(0),
            }
        } else {
            None
        };

        let local = caps
            .name("local")
            .map(|m| {
                m.as_str()
                    .split(['-', '_', '.'])
                    .map(|seg| match seg.parse::<u64>() {
                        Ok(n) => LocalSegment::Number(n),
                        Err(_) => LocalSegment::Text(seg.to_ascii_lowercase()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key().cmp(&other.cmp_key())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }

        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", release.join("."))?;

        if let Some(pre) = self.pre {
            write!(f, "{}{}", pre.kind.label(), pre.number)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if !self.local.is_empty() {
            let local: Vec<String> = self.local.iter().map(|s| s.to_string()).collect();
            write!(f, "+{}", local.join("."))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap_or_else(|| panic!("failed to parse {}", s))
    }

    #[test]
    fn test_parse_release() {
        let version = v("1.2.3");
        assert_eq!(version.epoch(), 0);
        assert_eq!(version.release(), &[1, 2, 3]);
        assert!(version.pre().is_none());
        assert!(version.is_stable());
    }

    #[test]
    fn test_parse_epoch() {
        let version = v("2!1.0");
        assert_eq!(version.epoch(), 2);
        assert_eq!(version.to_string(), "2!1.0");
    }

    #[test]
    fn test_parse_prerelease_spellings() {
        assert_eq!(v("1.0a1").to_string(), "1.0a1");
        assert_eq!(v("1.0-alpha.1").to_string(), "1.0a1");
        assert_eq!(v("1.0BETA2").to_string(), "1.0b2");
        assert_eq!(v("1.0c3").to_string(), "1.0rc3");
        assert_eq!(v("1.0-preview").to_string(), "1.0rc0");
        assert!(v("1.1.0rc1").is_prerelease());
    }

    #[test]
    fn test_parse_post_and_dev() {
        assert_eq!(v("1.0-1").to_string(), "1.0.post1");
        assert_eq!(v("1.0.rev2").to_string(), "1.0.post2");
        assert_eq!(v("0.1.7.post1").post(), Some(1));
        assert_eq!(v("1.1.0.dev0").dev(), Some(0));
        assert_eq!(v("1.0.dev").to_string(), "1.0.dev0");
        assert!(v("1.1.0.dev0").is_devrelease());
        assert!(v("1.1.0.dev0").is_prerelease());
        assert!(!v("0.1.7.post1").is_prerelease());
    }

    #[test]
    fn test_parse_local() {
        let version = v("1.0+Ubuntu-1");
        assert!(version.has_local());
        assert_eq!(version.to_string(), "1.0+ubuntu.1");
        assert!(!version.public().has_local());
    }

    #[test]
    fn test_parse_leading_v_and_whitespace() {
        assert_eq!(v(" v1.2 ").to_string(), "1.2");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Version::parse("").is_none());
        assert!(Version::parse("abc").is_none());
        assert!(Version::parse("1..0").is_none());
        assert!(Version::parse("1.0-foo-bar").is_none());
        assert!(Version::parse("2004d").is_none());
    }

    #[test]
    fn test_from_str_error() {
        let err = "not-a-version".parse::<Version>().unwrap_err();
        assert_eq!(err, VersionParseError("not-a-version".to_string()));
    }

    #[test]
    fn test_trailing_zeros_are_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert!(v("1.0") < v("1.0.1"));
    }

    #[test]
    fn test_multi_digit_ordering() {
        assert!(v("1.9.0") < v("1.10.0"));
        assert!(v("10.0.0") > v("9.0.0"));
    }

    #[test]
    fn test_epoch_dominates() {
        assert!(v("1!0.1") > v("2024.1"));
    }

    #[test]
    fn test_full_ordering_chain() {
        let ordered = [
            "1.0.dev456",
            "1.0a1",
            "1.0a2.dev456",
            "1.0a12.dev456",
            "1.0a12",
            "1.0b1.dev456",
            "1.0b2",
            "1.0b2.post345.dev456",
            "1.0b2.post345",
            "1.0rc1.dev456",
            "1.0rc1",
            "1.0",
            "1.0+abc.5",
            "1.0+abc.7",
            "1.0+5",
            "1.0.post456.dev34",
            "1.0.post456",
            "1.0.15",
            "1.1.dev1",
        ];

        for pair in ordered.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_base_version() {
        assert_eq!(v("1!2.3rc1.post2+x").base_version().to_string(), "1!2.3");
    }

    #[test]
    fn test_max_of_set() {
        let versions = ["1.0", "2.5.0", "2.0", "1.9.9"].map(v);
        assert_eq!(versions.iter().max().unwrap().to_string(), "2.5.0");
    }
}
