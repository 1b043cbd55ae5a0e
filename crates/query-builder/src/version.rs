use crate::{QueryError, QueryResult};
use semver::Version;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Version of the Parse Server a query is compiled for.
///
/// Comparison is semantic (`10.0.0` is newer than `2.7.0`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion(Version);

impl ServerVersion {
    /// `whereFullText` (`$text`) support.
    pub const FULL_TEXT_SEARCH: ServerVersion = ServerVersion::new(2, 5, 0);
    /// The `/aggregate` endpoint, used by `distinct` and `aggregate`.
    pub const AGGREGATE: ServerVersion = ServerVersion::new(2, 7, 0);
    /// From here on `keys` and `excludeKeys` are sent as arrays.
    pub const ARRAY_PROJECTION: ServerVersion = ServerVersion::new(5, 0, 0);

    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parses a version string, accepting a leading `v` and missing minor or
    /// patch components (`"5"` is `5.0.0`, `"2.7"` is `2.7.0`).
    pub fn parse(raw: &str) -> QueryResult<Self> {
        let trimmed = raw.trim().trim_start_matches(['v', 'V']);
        let suffix_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
        let (core, suffix) = trimmed.split_at(suffix_at);

        let padded = match core.split('.').count() {
            1 => format!("{core}.0.0{suffix}"),
            2 => format!("{core}.0{suffix}"),
            _ => trimmed.to_string(),
        };

        Version::parse(&padded)
            .map(Self)
            .map_err(|_| QueryError::InvalidVersion(raw.to_string()))
    }

    pub fn at_least(&self, floor: &ServerVersion) -> bool {
        self >= floor
    }

    /// Fails with [`QueryError::UnsupportedFeature`] when this version is below `floor`.
    pub fn require(&self, feature: &'static str, floor: &ServerVersion) -> QueryResult<()> {
        if self.at_least(floor) {
            Ok(())
        } else {
            debug!(feature, required = %floor, actual = %self, "feature gated by server version");
            Err(QueryError::UnsupportedFeature {
                feature,
                required: floor.clone(),
                actual: self.clone(),
            })
        }
    }

    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl Default for ServerVersion {
    fn default() -> Self {
        Self::ARRAY_PROJECTION
    }
}

impl FromStr for ServerVersion {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Version> for ServerVersion {
    fn from(version: Version) -> Self {
        Self(version)
    }
}

impl Display for ServerVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
