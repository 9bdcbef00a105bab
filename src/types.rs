//! Core data types for dependency reporting

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder used for any registry field that could not be determined
pub const UNKNOWN: &str = "unknown";

/// Maximum number of authors listed in a report
pub const TOP_AUTHORS_LIMIT: usize = 10;

/// Manifest group a dependency was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `dependencies`
    Runtime,
    /// `devDependencies`
    Dev,
    /// `peerDependencies`
    Peer,
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Runtime => write!(f, "dependency"),
            Self::Dev => write!(f, "devDependency"),
            Self::Peer => write!(f, "peerDependency"),
        }
    }
}

/// A single manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub name: String,
    /// Version range exactly as written in the manifest
    pub version_range: String,
    pub kind: DependencyKind,
}

/// Latest published metadata for a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub latest_version: String,
    pub description: Option<String>,
    pub license: String,
    pub author: String,
    pub homepage: Option<String>,
    pub repository_url: Option<String>,
    pub keywords: Vec<String>,
    pub maintainer_count: usize,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Report entry for one dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageAnalysis {
    pub name: String,
    /// Version range from the manifest
    pub installed: String,
    pub latest: String,
    pub kind: DependencyKind,
    pub description: Option<String>,
    pub license: String,
    pub author: String,
    pub homepage: Option<String>,
    pub repository_url: Option<String>,
    pub keywords: Vec<String>,
    pub maintainer_count: usize,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub is_outdated: bool,
    /// Why the registry lookup failed, for placeholder entries
    pub error: Option<String>,
}

impl PackageAnalysis {
    /// Merge a declaration with the registry's view of the package
    pub fn from_record(decl: DependencyDeclaration, record: RegistryRecord) -> Self {
        let is_outdated = crate::version::is_outdated(&decl.version_range, &record.latest_version);
        Self {
            name: decl.name,
            installed: decl.version_range,
            latest: record.latest_version,
            kind: decl.kind,
            description: record.description,
            license: record.license,
            author: record.author,
            homepage: record.homepage,
            repository_url: record.repository_url,
            keywords: record.keywords,
            maintainer_count: record.maintainer_count,
            created_at: record.created_at,
            modified_at: record.modified_at,
            is_outdated,
            error: None,
        }
    }

    /// Degraded entry for a package whose lookup failed
    pub fn placeholder(decl: DependencyDeclaration, error: impl Into<String>) -> Self {
        Self {
            name: decl.name,
            installed: decl.version_range,
            latest: UNKNOWN.to_string(),
            kind: decl.kind,
            description: None,
            license: UNKNOWN.to_string(),
            author: UNKNOWN.to_string(),
            homepage: None,
            repository_url: None,
            keywords: Vec::new(),
            maintainer_count: 0,
            created_at: None,
            modified_at: None,
            is_outdated: false,
            error: Some(error.into()),
        }
    }
}

/// Complete analysis of a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// `name` from the manifest, if any
    pub project_name: Option<String>,
    /// `version` from the manifest, if any
    pub project_version: Option<String>,
    /// Path of the analyzed manifest
    pub manifest_path: String,
    /// Timestamp when the analysis was performed
    pub timestamp: DateTime<Utc>,
    /// One entry per processed dependency, in manifest order
    pub packages: Vec<PackageAnalysis>,
    /// Summary statistics
    pub summary: ReportSummary,
}

/// Aggregate counts over all packages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_packages: usize,
    pub outdated_packages: usize,
    pub failed_packages: usize,
    /// License string to package count, in first-seen order
    pub license_histogram: IndexMap<String, usize>,
    /// Most frequent authors, descending by count
    pub top_authors: Vec<AuthorCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub packages: usize,
}

impl AnalysisReport {
    /// Create a new, empty report
    pub fn new(manifest_path: String) -> Self {
        Self {
            project_name: None,
            project_version: None,
            manifest_path,
            timestamp: Utc::now(),
            packages: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    /// Compute summary statistics from packages
    pub fn compute_summary(&mut self) {
        let mut outdated = 0;
        let mut failed = 0;
        let mut licenses: IndexMap<String, usize> = IndexMap::new();
        let mut authors: IndexMap<&str, usize> = IndexMap::new();

        for pkg in &self.packages {
            if pkg.is_outdated {
                outdated += 1;
            }
            if pkg.error.is_some() {
                failed += 1;
            }

            let license = if pkg.license.trim().is_empty() {
                UNKNOWN
            } else {
                pkg.license.as_str()
            };
            *licenses.entry(license.to_string()).or_insert(0) += 1;

            let author = pkg.author.trim();
            if !author.is_empty() && author != UNKNOWN {
                *authors.entry(author).or_insert(0) += 1;
            }
        }

        let mut top_authors: Vec<AuthorCount> = authors
            .into_iter()
            .map(|(author, packages)| AuthorCount {
                author: author.to_string(),
                packages,
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts
        top_authors.sort_by(|a, b| b.packages.cmp(&a.packages));
        top_authors.truncate(TOP_AUTHORS_LIMIT);

        self.summary = ReportSummary {
            total_packages: self.packages.len(),
            outdated_packages: outdated,
            failed_packages: failed,
            license_histogram: licenses,
            top_authors,
        };
    }
}
