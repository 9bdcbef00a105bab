//! # dependency_report
//!
//! Reads a `package.json`, looks up the latest published version of every
//! declared dependency on an npm-compatible registry, and summarizes:
//! - **Version currency**: which dependencies lag behind the latest release
//! - **License distribution**: how many packages use each license
//! - **Authorship**: the most frequent package authors
//!
//! ## Quick Start
//!
//! ```no_run
//! use dependency_report::{analyze_project, render_markdown, AnalyzerConfig};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = AnalyzerConfig::default();
//! let report = analyze_project(Path::new("package.json"), &config).await?;
//!
//! for pkg in &report.packages {
//!     println!("{}: {} -> {}", pkg.name, pkg.installed, pkg.latest);
//! }
//! std::fs::write("dependency-analysis-report.md", render_markdown(&report))?;
//! # Ok(())
//! # }
//! ```
//!
//! Lookups are strictly sequential and paced (a short pause after every
//! request, a long one after every batch) to stay polite to the registry.
//! A failed lookup never aborts the run; the package is reported with
//! `unknown` fields instead.

mod analyze;
mod config;
mod error;
mod metadata;
mod parser;
mod report;
mod types;
mod version;

// Re-export public API
pub use analyze::{analyze_project, Analyzer};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, RegistryConfig, DEFAULT_REGISTRY_URL};
pub use error::{ReportError, Result};
pub use metadata::RegistryClient;
pub use parser::{parse_manifest, Manifest};
pub use report::{render_json, render_markdown};
pub use types::{
    AnalysisReport, AuthorCount, DependencyDeclaration, DependencyKind, PackageAnalysis,
    RegistryRecord, ReportSummary,
};
pub use version::is_outdated;
