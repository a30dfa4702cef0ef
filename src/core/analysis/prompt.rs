/// What is known about one failed test.
#[derive(Clone, Debug)]
pub struct FailureReport {
    pub test_name: String,
    pub error_type: String,
    pub error_message: String,
    pub traceback: Option<String>,
}

const TRACEBACK_TAIL: usize = 3;

pub fn build_prompt(report: &FailureReport) -> String {
    let mut prompt = format!(
        "Analyze this test automation failure and provide:
1. Root cause (most likely reason for failure)
2. Suggested fix (specific action to resolve)
3. Confidence level (high/medium/low)

Test: {}
Error Type: {}
Error Message: {}",
        report.test_name, report.error_type, report.error_message
    );

    if let Some(traceback) = report.traceback.as_deref().filter(|t| !t.trim().is_empty()) {
        let lines: Vec<&str> = traceback.trim().lines().collect();
        let tail = &lines[lines.len().saturating_sub(TRACEBACK_TAIL)..];
        prompt.push_str(&format!(
            "\nTraceback (last {TRACEBACK_TAIL} lines):\n{}",
            tail.join("\n")
        ));
    }

    prompt.push_str(
        "\n\nProvide analysis in this format:\nRoot Cause: <cause>\nSuggested Fix: <fix>\nConfidence: <level>",
    );

    prompt
}
