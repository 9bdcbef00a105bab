//! Main analysis orchestration logic

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::metadata::RegistryClient;
use crate::parser::parse_manifest;
use crate::types::{AnalysisReport, DependencyDeclaration, PackageAnalysis};
use std::path::Path;
use tracing::{debug, info, warn};

/// Analyze a manifest and build a dependency report
pub async fn analyze_project(
    manifest_path: &Path,
    config: &AnalyzerConfig,
) -> Result<AnalysisReport> {
    let mut analyzer = Analyzer::new(config)?;
    analyzer.analyze(manifest_path, |_, _, _| {}).await
}

/// One analysis session. Owns the registry client and its request counter.
pub struct Analyzer {
    client: RegistryClient,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            client: RegistryClient::new(&config.registry)?,
            config: config.clone(),
        })
    }

    /// Run the pipeline over the manifest at `manifest_path`.
    ///
    /// `on_progress` is called after each package with its entry, its
    /// 1-based position and the number of packages to process.
    pub async fn analyze<F>(
        &mut self,
        manifest_path: &Path,
        mut on_progress: F,
    ) -> Result<AnalysisReport>
    where
        F: FnMut(&PackageAnalysis, usize, usize),
    {
        info!("Starting analysis of manifest: {}", manifest_path.display());

        let manifest = parse_manifest(manifest_path)?;
        let declarations: Vec<DependencyDeclaration> = manifest
            .declarations()
            .into_iter()
            .filter(|decl| {
                let ignored = self.config.ignored_dependencies.contains(&decl.name);
                if ignored {
                    debug!("Skipping ignored dependency: {}", decl.name);
                }
                !ignored
            })
            .collect();

        let total = declarations.len();
        info!("Found {} dependencies to analyze", total);

        let mut report = AnalysisReport::new(manifest_path.display().to_string());
        report.project_name = manifest.name;
        report.project_version = manifest.version;

        for (index, decl) in declarations.into_iter().enumerate() {
            let analysis = self.analyze_dependency(decl).await;
            on_progress(&analysis, index + 1, total);
            report.packages.push(analysis);
        }

        report.compute_summary();

        info!(
            "Analysis complete: {}/{} outdated, {} lookups failed",
            report.summary.outdated_packages,
            report.summary.total_packages,
            report.summary.failed_packages,
        );

        Ok(report)
    }

    /// Fetch one dependency, degrading to a placeholder on failure
    async fn analyze_dependency(&mut self, decl: DependencyDeclaration) -> PackageAnalysis {
        debug!("Analyzing {} {} ({})", decl.name, decl.version_range, decl.kind);

        match self.client.fetch_latest(&decl.name).await {
            Ok(record) => PackageAnalysis::from_record(decl, record),
            Err(e) => {
                warn!("{}", e);
                PackageAnalysis::placeholder(decl, e.to_string())
            }
        }
    }

    /// Registry requests issued by this session
    pub fn request_count(&self) -> u64 {
        self.client.request_count()
    }
}
