//! Application version and release notes.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
    pub build: u32,
}

pub const CURRENT: Version = Version {
    major: 1,
    minor: 1,
    revision: 0,
    build: 100,
};

impl Version {
    /// `v1.1.0 (build 100)`
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "v{}.{}.{} (build {})",
            self.major, self.minor, self.revision, self.build
        )
    }
}

/// Dotted form, `1.1.0.100`. This is what the config stores.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.revision, self.build
        )
    }
}

impl FromStr for Version {
    type Err = String;

    /// Accepts two to four dotted numbers. Missing parts are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .trim_start_matches('v')
            .split('.')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid version {s}: {e}"))?;

        if !(2..=4).contains(&parts.len()) {
            return Err(format!("Invalid version {s}: expected 2 to 4 parts"));
        }
        let part = |i: usize| parts.get(i).copied().unwrap_or(0);
        Ok(Self {
            major: part(0),
            minor: part(1),
            revision: part(2),
            build: part(3),
        })
    }
}

pub struct Release {
    pub version: Version,
    pub notes: &'static [&'static str],
}

/// Newest first.
pub const CHANGELOG: &[Release] = &[
    Release {
        version: CURRENT,
        notes: &[
            "Make popup lists needed and available stock and refuses shortfalls",
            "BOM export from the make popup scales quantities by the build count",
            "Options apply the log level immediately",
            "What's new popup on first start after an update",
        ],
    },
    Release {
        version: Version {
            major: 1,
            minor: 0,
            revision: 1,
            build: 60,
        },
        notes: &[
            "Categories can be looked up by prefix",
            "Login failures reopen the login popup",
        ],
    },
    Release {
        version: Version {
            major: 1,
            minor: 0,
            revision: 0,
            build: 1,
        },
        notes: &["Items, categories and BOMs viewers", "CSV export"],
    },
];

/// Releases newer than `last_seen`. An unknown or unparsable version sees
/// every release.
#[must_use]
pub fn changes_since(last_seen: Option<&str>) -> Vec<&'static Release> {
    let last_seen = last_seen.and_then(|v| v.parse::<Version>().ok());
    CHANGELOG
        .iter()
        .filter(|release| last_seen.is_none_or(|seen| release.version > seen))
        .collect()
}
