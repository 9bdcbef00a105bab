//! Parser for package.json manifests

use crate::error::{ReportError, Result};
use crate::types::{DependencyDeclaration, DependencyKind};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// The parts of a package.json the report cares about
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub peer_dependencies: IndexMap<String, String>,
}

impl Manifest {
    /// Parse manifest text; `path` is only used for error messages
    pub fn from_json(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ReportError::manifest(path, e.to_string()))
    }

    /// Flatten runtime, dev and peer dependencies, in that order
    pub fn declarations(&self) -> Vec<DependencyDeclaration> {
        let groups = [
            (&self.dependencies, DependencyKind::Runtime),
            (&self.dev_dependencies, DependencyKind::Dev),
            (&self.peer_dependencies, DependencyKind::Peer),
        ];

        groups
            .into_iter()
            .flat_map(|(deps, kind)| {
                deps.iter().map(move |(name, range)| DependencyDeclaration {
                    name: name.clone(),
                    version_range: range.clone(),
                    kind,
                })
            })
            .collect()
    }
}

/// Read and parse a package.json
pub fn parse_manifest(path: &Path) -> Result<Manifest> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ReportError::manifest(path, e.to_string()))?;
    let manifest = Manifest::from_json(&content, path)?;

    debug!(
        "Parsed {}: {} runtime, {} dev, {} peer dependencies",
        path.display(),
        manifest.dependencies.len(),
        manifest.dev_dependencies.len(),
        manifest.peer_dependencies.len()
    );

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_manifest(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_groups_concatenated_in_fixed_order() {
        let file = write_manifest(
            r#"{
                "name": "demo",
                "peerDependencies": { "react": "^18.0.0" },
                "devDependencies": { "zod": "^3.0.0", "tsx": "^4.0.0" },
                "dependencies": { "lodash": "^4.17.0" }
            }"#,
        );

        let manifest = parse_manifest(file.path()).unwrap();
        let decls = manifest.declarations();

        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["lodash", "zod", "tsx", "react"]);
        assert_eq!(decls[0].kind, DependencyKind::Runtime);
        assert_eq!(decls[1].kind, DependencyKind::Dev);
        assert_eq!(decls[3].kind, DependencyKind::Peer);
        assert_eq!(decls[2].version_range, "^4.0.0");
        assert_eq!(manifest.name.as_deref(), Some("demo"));
    }

    #[test]
    fn test_missing_groups_are_empty() {
        let file = write_manifest(r#"{ "name": "bare" }"#);
        let manifest = parse_manifest(file.path()).unwrap();
        assert!(manifest.declarations().is_empty());
        assert!(manifest.version.is_none());
    }

    #[test]
    fn test_malformed_json_is_manifest_error() {
        let file = write_manifest("{ not json");
        let err = parse_manifest(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::Manifest { .. }));
    }

    #[test]
    fn test_non_string_range_is_manifest_error() {
        let file = write_manifest(r#"{ "dependencies": { "a": 1 } }"#);
        assert!(matches!(
            parse_manifest(file.path()),
            Err(ReportError::Manifest { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_manifest_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_manifest(&dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, ReportError::Manifest { .. }));
    }
}
