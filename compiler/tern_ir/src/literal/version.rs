//! Semantic-version literals (`v"1.2.3-rc.1+build.5"`).

use std::cmp::Ordering;
use std::fmt;

/// Error parsing a semantic version.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("empty version")]
    Empty,
    #[error("expected major.minor.patch, found `{0}`")]
    MissingComponent(String),
    #[error("invalid numeric component `{0}`")]
    InvalidNumber(String),
    #[error("numeric component `{0}` has a leading zero")]
    LeadingZero(String),
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
}

/// A semantic version: `major.minor.patch`, optional pre-release
/// identifiers after `-`, optional build metadata after `+`.
///
/// Ordering follows semantic-version precedence; build metadata only breaks
/// ties so that ordering stays consistent with equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Vec<String>,
    pub build: Vec<String>,
}

impl Version {
    /// Create a release version with no pre-release or build parts.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Parse a version string.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        if text.is_empty() {
            return Err(VersionError::Empty);
        }

        let (rest, build) = match text.split_once('+') {
            Some((rest, build)) => (rest, parse_identifiers(build, false)?),
            None => (text, Vec::new()),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, parse_identifiers(pre, true)?),
            None => (rest, Vec::new()),
        };

        let mut parts = core.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(VersionError::MissingComponent(core.to_string()));
        };

        Ok(Version {
            major: parse_numeric(major)?,
            minor: parse_numeric(minor)?,
            patch: parse_numeric(patch)?,
            pre,
            build,
        })
    }

    /// Check if this is a pre-release.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

fn parse_numeric(part: &str) -> Result<u64, VersionError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::InvalidNumber(part.to_string()));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(VersionError::LeadingZero(part.to_string()));
    }
    part.parse()
        .map_err(|_| VersionError::InvalidNumber(part.to_string()))
}

fn parse_identifiers(text: &str, numeric_rules: bool) -> Result<Vec<String>, VersionError> {
    text.split('.')
        .map(|ident| {
            let valid = !ident.is_empty()
                && ident
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-');
            if !valid {
                return Err(VersionError::InvalidIdentifier(ident.to_string()));
            }
            if numeric_rules
                && ident.len() > 1
                && ident.starts_with('0')
                && ident.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(VersionError::LeadingZero(ident.to_string()));
            }
            Ok(ident.to_string())
        })
        .collect()
}

/// Precedence of two pre-release identifiers.
fn cmp_identifier(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    for (a, b) in self.pre.iter().zip(&other.pre) {
                        let ord = cmp_identifier(a, b);
                        if ord != Ordering::Equal {
                            return ord;
                        }
                    }
                    self.pre.len().cmp(&other.pre.len())
                }
            })
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}
