// ABOUTME: Transcript scanner recognizing known foundation failure patterns.
// ABOUTME: Matches become formatted diagnosis blocks and the surfaced error.

use crate::transcript::Transcript;
use std::fmt;

/// One known failure signature and its diagnosis.
#[derive(Debug, Clone)]
pub struct DiagnosticMatcher {
    /// Substring looked for in the transcript.
    pub pattern: String,
    pub error: String,
    pub details: String,
    pub solution: String,
}

impl DiagnosticMatcher {
    pub fn new(
        pattern: impl Into<String>,
        error: impl Into<String>,
        details: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            error: error.into(),
            details: details.into(),
            solution: solution.into(),
        }
    }
}

/// A diagnosis produced by a matcher hit.
#[derive(Debug, Clone)]
pub struct MatchedError {
    pub message: String,
    pub details: String,
    pub solution: String,
}

impl fmt::Display for MatchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MatchedError {}

/// Scans deployment transcripts for known diagnostics.
pub struct ErrorFinder {
    matchers: Vec<DiagnosticMatcher>,
}

impl ErrorFinder {
    pub fn new(matchers: Vec<DiagnosticMatcher>) -> Self {
        Self { matchers }
    }

    /// Matchers for the failure modes foundations report only inside
    /// their push output.
    pub fn with_default_matchers() -> Self {
        Self::new(vec![
            DiagnosticMatcher::new(
                "insufficient resources",
                "insufficient resources on foundation",
                "The foundation has no room for the requested instance count.",
                "Lower the instance count or memory allocation, or contact the foundation operators.",
            ),
            DiagnosticMatcher::new(
                "disk quota exceeded",
                "application exceeded its disk quota",
                "The application wrote more data than its disk quota allows.",
                "Raise disk_quota in the application manifest.",
            ),
            DiagnosticMatcher::new(
                "None of the buildpacks detected",
                "no buildpack detected the application",
                "The pushed artifact does not match any installed buildpack.",
                "Name a buildpack explicitly in the application manifest.",
            ),
            DiagnosticMatcher::new(
                "out of memory",
                "application ran out of memory",
                "An application instance was killed for exceeding its memory limit.",
                "Raise the memory allocation in the application manifest.",
            ),
        ])
    }

    /// All diagnoses recognized in `text`, in matcher registration order.
    pub fn find(&self, text: &str) -> Vec<MatchedError> {
        self.matchers
            .iter()
            .filter(|m| text.contains(&m.pattern))
            .map(|m| MatchedError {
                message: m.error.clone(),
                details: m.details.clone(),
                solution: m.solution.clone(),
            })
            .collect()
    }

    /// Scan the transcript, append a diagnosis block per match, and
    /// return the first match.
    pub fn annotate(&self, transcript: &Transcript) -> Option<MatchedError> {
        let matches = self.find(&transcript.contents());

        for found in &matches {
            transcript.write_line("");
            transcript.write_line("*******************");
            transcript.write_line("");
            transcript.write_line(&format!(
                "The following error was found in the above logs: {}",
                found.message
            ));
            transcript.write_line("");
            transcript.write_line(&format!("Error: {}", found.details));
            transcript.write_line("");
            transcript.write_line(&format!("Potential solution: {}", found.solution));
            transcript.write_line("");
            transcript.write_line("*******************");
        }

        matches.into_iter().next()
    }
}
