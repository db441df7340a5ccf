//! Cache keys, their TTLs and the invalidation policy.
//!
//! Mutation sites never name cache keys themselves. They describe what
//! happened as a [`Mutation`] and [`Mutation::invalidated_keys`] decides
//! which cached reads can no longer be trusted.

use std::time::Duration;

use crate::types::DbId;

/// TTL for cached list endpoints.
pub const LIST_TTL: Duration = Duration::from_secs(600);

/// TTL for a cached single project.
pub const PROJECT_TTL: Duration = Duration::from_secs(1800);

/// TTL for cached portfolio statistics.
pub const STATS_TTL: Duration = Duration::from_secs(1800);

/// TTL for cached singleton records (biography, contact settings).
pub const SINGLETON_TTL: Duration = Duration::from_secs(1800);

/// A cacheable public read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    PublishedProjects,
    FeaturedProjects,
    PortfolioStats,
    Categories,
    Biography,
    ContactSettings,
    Project(DbId),
}

impl CacheKey {
    pub fn ttl(self) -> Duration {
        match self {
            Self::PublishedProjects | Self::FeaturedProjects | Self::Categories => LIST_TTL,
            Self::PortfolioStats => STATS_TTL,
            Self::Biography | Self::ContactSettings => SINGLETON_TTL,
            Self::Project(_) => PROJECT_TTL,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PublishedProjects => f.write_str("projects:published"),
            Self::FeaturedProjects => f.write_str("projects:featured"),
            Self::PortfolioStats => f.write_str("portfolio:stats"),
            Self::Categories => f.write_str("categories"),
            Self::Biography => f.write_str("biography"),
            Self::ContactSettings => f.write_str("contact:settings"),
            Self::Project(id) => write!(f, "project:{id}"),
        }
    }
}

/// A write that may change what public reads return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    ProjectCreated,
    ProjectUpdated(DbId),
    ProjectDeleted(DbId),
    ProjectMediaChanged(DbId),
    ProjectsReordered(Vec<DbId>),
    CategoryChanged,
    BiographyChanged,
    ContactSettingsChanged,
}

/// Keys derived from the project collection as a whole.
const PROJECT_COLLECTION_KEYS: [CacheKey; 3] = [
    CacheKey::PublishedProjects,
    CacheKey::FeaturedProjects,
    CacheKey::PortfolioStats,
];

impl Mutation {
    /// Whether the mutation can change the `displayOrder` of projects other
    /// than the ones it names. Such mutations stale every cached
    /// `project:{id}` entry.
    pub fn shifts_ranks(&self) -> bool {
        matches!(
            self,
            Self::ProjectCreated | Self::ProjectDeleted(_) | Self::ProjectsReordered(_)
        )
    }

    /// Every cache key whose value this mutation may have changed.
    pub fn invalidated_keys(&self) -> Vec<CacheKey> {
        match self {
            Self::ProjectCreated => PROJECT_COLLECTION_KEYS.to_vec(),
            Self::ProjectUpdated(id) | Self::ProjectDeleted(id) | Self::ProjectMediaChanged(id) => {
                let mut keys = PROJECT_COLLECTION_KEYS.to_vec();
                keys.push(CacheKey::Project(*id));
                keys
            }
            Self::ProjectsReordered(ids) => {
                let mut keys = PROJECT_COLLECTION_KEYS.to_vec();
                keys.extend(ids.iter().map(|id| CacheKey::Project(*id)));
                keys
            }
            Self::CategoryChanged => vec![CacheKey::Categories, CacheKey::PortfolioStats],
            Self::BiographyChanged => vec![CacheKey::Biography],
            Self::ContactSettingsChanged => vec![CacheKey::ContactSettings],
        }
    }
}
