//! Markdown and JSON rendering of an analysis report

use crate::error::Result;
use crate::types::{AnalysisReport, PackageAnalysis};
use chrono::SecondsFormat;

const AUTHOR_COLUMN_WIDTH: usize = 20;

/// Render the report as pretty-printed JSON
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the report as a markdown document
pub fn render_markdown(report: &AnalysisReport) -> String {
    let summary = &report.summary;
    let total = summary.total_packages;
    let mut md = String::new();

    md.push_str("# Dependency Analysis Report\n\n");
    if let Some(name) = &report.project_name {
        match &report.project_version {
            Some(version) => md.push_str(&format!("**Project:** {}@{}\n\n", name, version)),
            None => md.push_str(&format!("**Project:** {}\n\n", name)),
        }
    }
    md.push_str(&format!(
        "**Generated:** {}\n\n",
        report.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Total Packages:** {}\n", total));
    md.push_str(&format!(
        "- **Outdated Packages:** {} ({})\n",
        summary.outdated_packages,
        percentage(summary.outdated_packages, total)
    ));
    if summary.failed_packages > 0 {
        md.push_str(&format!("- **Failed Lookups:** {}\n", summary.failed_packages));
    }
    md.push('\n');

    md.push_str("## License Distribution\n\n");
    let mut licenses: Vec<(&String, &usize)> = summary.license_histogram.iter().collect();
    licenses.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (license, count) in licenses {
        md.push_str(&format!(
            "- **{}:** {} ({})\n",
            license,
            count,
            percentage(*count, total)
        ));
    }
    md.push('\n');

    if !summary.top_authors.is_empty() {
        md.push_str("## Top Authors\n\n");
        for (rank, author) in summary.top_authors.iter().enumerate() {
            md.push_str(&format!(
                "{}. **{}** ({} {})\n",
                rank + 1,
                author.author,
                author.packages,
                if author.packages == 1 { "package" } else { "packages" }
            ));
        }
        md.push('\n');
    }

    let outdated: Vec<&PackageAnalysis> =
        report.packages.iter().filter(|p| p.is_outdated).collect();
    if !outdated.is_empty() {
        md.push_str("## Outdated Packages\n\n");
        md.push_str("| Package | Installed | Latest | Type |\n");
        md.push_str("|---------|-----------|--------|------|\n");
        for pkg in outdated {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                cell(&pkg.name),
                cell(&pkg.installed),
                cell(&pkg.latest),
                pkg.kind
            ));
        }
        md.push('\n');
    }

    md.push_str("## All Packages\n\n");
    md.push_str("| Package | Installed | Latest | License | Author | Outdated |\n");
    md.push_str("|---------|-----------|--------|---------|--------|----------|\n");
    let mut packages: Vec<&PackageAnalysis> = report.packages.iter().collect();
    packages.sort_by(|a, b| a.name.cmp(&b.name));
    for pkg in packages {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            cell(&pkg.name),
            cell(&pkg.installed),
            cell(&pkg.latest),
            cell(&pkg.license),
            cell(&truncate(&pkg.author, AUTHOR_COLUMN_WIDTH)),
            if pkg.is_outdated { "⚠️" } else { "✅" }
        ));
    }

    md
}

/// `part` as a percentage of `total` with one decimal, or `N/A` when empty.
///
/// Halves round away from zero (6.25 -> 6.3); `{:.1}` alone would round
/// them to even.
fn percentage(part: usize, total: usize) -> String {
    if total == 0 {
        return "N/A".to_string();
    }
    let tenths = (part as f64 * 1000.0 / total as f64).round();
    format!("{:.1}%", tenths / 10.0)
}

/// Escape the column separator so registry text cannot split a table row
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::package;
    use crate::types::DependencyKind;
    use chrono::{TimeZone, Utc};

    fn report_with(packages: Vec<PackageAnalysis>) -> AnalysisReport {
        let mut report = AnalysisReport::new("package.json".to_string());
        report.timestamp = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        report.packages = packages;
        report.compute_summary();
        report
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(3, 3), "100.0%");
        assert_eq!(percentage(3, 4), "75.0%");
        assert_eq!(percentage(1, 3), "33.3%");
        assert_eq!(percentage(2, 3), "66.7%");
        assert_eq!(percentage(0, 0), "N/A");
    }

    #[test]
    fn test_percentage_rounds_halves_up() {
        assert_eq!(percentage(1, 16), "6.3%");
        assert_eq!(percentage(5, 16), "31.3%");
        assert_eq!(percentage(3, 16), "18.8%");
        assert_eq!(percentage(1, 8), "12.5%");
    }

    #[test]
    fn test_table_cells_escape_pipes() {
        assert_eq!(cell("a|b"), "a\\|b");
        assert_eq!(cell("plain"), "plain");

        let md = render_markdown(&report_with(vec![package(
            "pipe-pkg",
            "MIT | Apache-2.0",
            "Foo | Bar",
            true,
        )]));
        assert!(md.contains(
            "| pipe-pkg | ^1.0.0 | 2.0.0 | MIT \\| Apache-2.0 | Foo \\| Bar | ⚠️ |\n"
        ));
        assert!(md.contains("| pipe-pkg | ^1.0.0 | 2.0.0 | dependency |\n"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("exactly twenty chars", 20), "exactly twenty chars");
        assert_eq!(
            truncate("Sindre Sorhus <sindresorhus@gmail.com>", 20),
            "Sindre Sorhus <sindr..."
        );
        assert_eq!(truncate(&"é".repeat(21), 20), format!("{}...", "é".repeat(20)));
    }

    #[test]
    fn test_all_outdated_dev_dependencies() {
        let mut packages = Vec::new();
        for (name, installed, latest) in [
            ("@types/node", "^20.0.0", "24.3.0"),
            ("tsx", "^4.0.0", "4.20.5"),
            ("typescript", "^5.0.0", "5.9.2"),
        ] {
            let mut pkg = package(name, "MIT", "unknown", true);
            pkg.installed = installed.to_string();
            pkg.latest = latest.to_string();
            pkg.kind = DependencyKind::Dev;
            packages.push(pkg);
        }
        let md = render_markdown(&report_with(packages));

        assert!(md.starts_with("# Dependency Analysis Report\n"));
        assert!(md.contains("**Generated:** 2025-01-02T03:04:05Z"));
        assert!(md.contains("- **Total Packages:** 3\n"));
        assert!(md.contains("- **Outdated Packages:** 3 (100.0%)\n"));
        assert!(md.contains("- **MIT:** 3 (100.0%)\n"));
        assert!(md.contains("## Outdated Packages"));
        assert!(md.contains("| @types/node | ^20.0.0 | 24.3.0 | devDependency |\n"));
        assert!(md.contains("| tsx | ^4.0.0 | 4.20.5 | devDependency |\n"));
        assert!(md.contains("| typescript | ^5.0.0 | 5.9.2 | devDependency |\n"));
        assert!(!md.contains("## Top Authors"));
        assert!(!md.contains("Failed Lookups"));
    }

    #[test]
    fn test_sections_and_ordering() {
        let md = render_markdown(&report_with(vec![
            package("zeta", "ISC", "amy", false),
            package("alpha", "MIT", "A very long author name indeed", true),
            package("mid", "MIT", "amy", false),
            package("beta", "MIT", "bob", false),
        ]));

        assert!(md.contains("- **Outdated Packages:** 1 (25.0%)\n"));

        let mit = md.find("- **MIT:** 3 (75.0%)").unwrap();
        let isc = md.find("- **ISC:** 1 (25.0%)").unwrap();
        assert!(mit < isc);

        assert!(md.contains("1. **amy** (2 packages)\n"));
        assert!(md.contains("2. **A very long author name indeed** (1 package)\n"));

        let all = md.find("## All Packages").unwrap();
        let rows = &md[all..];
        let order: Vec<usize> = ["| alpha |", "| beta |", "| mid |", "| zeta |"]
            .iter()
            .map(|row| rows.find(row).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(
            rows.contains("| alpha | ^1.0.0 | 2.0.0 | MIT | A very long author n... | ⚠️ |\n")
        );
        assert!(rows.contains("| beta | ^1.0.0 | 1.0.0 | MIT | bob | ✅ |\n"));
    }

    #[test]
    fn test_empty_report_uses_na() {
        let md = render_markdown(&report_with(Vec::new()));
        assert!(md.contains("- **Total Packages:** 0\n"));
        assert!(md.contains("- **Outdated Packages:** 0 (N/A)\n"));
        assert!(!md.contains("NaN"));
        assert!(!md.contains("## Outdated Packages"));
        assert!(md.contains("## All Packages"));
    }

    #[test]
    fn test_project_header_and_failures() {
        let mut report = report_with(vec![PackageAnalysis::placeholder(
            crate::types::DependencyDeclaration {
                name: "gone".to_string(),
                version_range: "^1.0.0".to_string(),
                kind: DependencyKind::Runtime,
            },
            "HTTP 404",
        )]);
        report.project_name = Some("demo".to_string());
        report.project_version = Some("1.2.3".to_string());

        let md = render_markdown(&report);
        assert!(md.contains("**Project:** demo@1.2.3\n"));
        assert!(md.contains("- **Failed Lookups:** 1\n"));
        assert!(md.contains("| gone | ^1.0.0 | unknown | unknown | unknown | ✅ |\n"));
    }

    #[test]
    fn test_json_round_trips_summary() {
        let report = report_with(vec![package("a", "MIT", "amy", true)]);
        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total_packages"], 1);
        assert_eq!(value["summary"]["license_histogram"]["MIT"], 1);
        assert_eq!(value["packages"][0]["kind"], "runtime");
    }
}
