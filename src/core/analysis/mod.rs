use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};

pub mod ollama;
pub mod prompt;

pub use ollama::{CompletionProvider, OllamaProvider};
pub use prompt::{build_prompt, FailureReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisStatus {
    Success,
    Failed,
}

#[derive(Clone, Debug)]
pub struct FailureAnalysis {
    pub status: AnalysisStatus,
    pub test_name: String,
    pub error_type: String,
    pub analysis: String,
    pub timestamp: DateTime<Utc>,
    pub analyzer: String,
}

impl FailureAnalysis {
    /// Console block printed after a failed test.
    pub fn render(&self) -> String {
        let rule = "=".repeat(70);
        let title = match self.status {
            AnalysisStatus::Success => "AI FAILURE ANALYSIS",
            AnalysisStatus::Failed => "AI FAILURE ANALYSIS (unavailable)",
        };

        format!(
            "{rule}\n{title}\n{rule}\nTest: {}\nError: {}\n{}\n{}\n{}\nAnalyzed by {} at {}\n",
            self.test_name,
            self.error_type,
            "-".repeat(70),
            self.analysis.trim(),
            rule,
            self.analyzer,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}

/// Best-effort summarization of test failures. Never fails: when the model
/// cannot be reached the returned analysis says so.
pub struct FailureAnalyzer {
    provider: Box<dyn CompletionProvider>,
}

impl FailureAnalyzer {
    pub fn new(provider: Box<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub async fn analyze(&self, report: &FailureReport) -> FailureAnalysis {
        info!("analyzing failure for: {}", report.test_name);

        let prompt = build_prompt(report);

        let (status, analysis, analyzer) = match self.provider.complete(prompt).await {
            Ok(text) => (AnalysisStatus::Success, text, self.provider.label()),
            Err(e) => {
                warn!("AI analysis failed: {e}");
                (
                    AnalysisStatus::Failed,
                    format!("AI analysis failed: {e}"),
                    format!("{} (error)", self.provider.label()),
                )
            }
        };

        FailureAnalysis {
            status,
            test_name: report.test_name.clone(),
            error_type: report.error_type.clone(),
            analysis,
            timestamp: Utc::now(),
            analyzer,
        }
    }
}
