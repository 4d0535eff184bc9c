//! Diagnostics for the lint passes.

use lsp_types::{Diagnostic, DiagnosticSeverity};
use pua_syntax::{lint, Lint, Severity};

use super::utils::to_lsp_range;

/// Run every lint pass over `text` and convert the findings.
pub fn build_diagnostics(text: &str, source: &str) -> Vec<Diagnostic> {
    lint(text)
        .iter()
        .map(|finding| lint_to_diagnostic(finding, source))
        .collect()
}

/// Convert a single lint finding to an LSP diagnostic.
pub fn lint_to_diagnostic(finding: &Lint, source: &str) -> Diagnostic {
    let severity = match finding.severity() {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: to_lsp_range(finding.range),
        severity: Some(severity),
        source: Some(source.to_string()),
        message: finding.message(),
        ..Default::default()
    }
}
