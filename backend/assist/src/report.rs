use std::fmt::Write;
use std::sync::Arc;

use tracing::{info, warn};

use accessibridge_core::{AssistProvider, HeuristicsReport, ReportSource, SynthesizedReport};
use accessibridge_logging::redact_sensitive_data;

/// Builds narrative accessibility reports, preferring the AI provider.
pub struct ReportSynthesizer {
    provider: Option<Arc<dyn AssistProvider>>,
}

impl ReportSynthesizer {
    pub fn new(provider: Option<Arc<dyn AssistProvider>>) -> Self {
        Self { provider }
    }

    /// Never fails: any AI problem degrades to [`fallback_report`].
    pub async fn synthesize(&self, heuristics: &HeuristicsReport) -> SynthesizedReport {
        let Some(provider) = &self.provider else {
            return SynthesizedReport {
                markdown: fallback_report(heuristics),
                source: ReportSource::Fallback,
                ai_error: None,
            };
        };

        match provider.generate_report(heuristics).await {
            Ok(markdown) => {
                info!(provider = provider.name(), model = provider.model(), "AI report generated");
                SynthesizedReport {
                    markdown,
                    source: ReportSource::Ai,
                    ai_error: None,
                }
            }
            Err(e) => {
                let reason = redact_sensitive_data(&format!("{e:#}"));
                warn!(provider = provider.name(), error = %reason, "AI report failed, using fallback");
                SynthesizedReport {
                    markdown: fallback_report(heuristics),
                    source: ReportSource::Fallback,
                    ai_error: Some(reason),
                }
            }
        }
    }
}

/// Deterministic Markdown report built from the heuristics alone.
pub fn fallback_report(heuristics: &HeuristicsReport) -> String {
    let title = heuristics
        .meta
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("Untitled page");
    let url = heuristics
        .meta
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or("Unknown URL");

    let mut findings = Vec::new();
    let missing_alt = heuristics.images.missing_alt;
    if missing_alt > 0 {
        findings.push(format!(
            "**Add alt text** to {missing_alt} {} so screen reader users know what they show (WCAG 1.1.1).",
            plural(missing_alt, "image", "images")
        ));
    }
    let unlabeled = heuristics.forms.inputs_without_label;
    if unlabeled > 0 {
        findings.push(format!(
            "**Associate labels** with {unlabeled} form {} using `<label for>` or `aria-labelledby` (WCAG 1.3.1, 3.3.2).",
            plural(unlabeled, "input", "inputs")
        ));
    }
    let generic = heuristics.links.generic_text;
    if generic > 0 {
        findings.push(format!(
            "**Use descriptive link text** for {generic} {} that only say things like \"click here\" or \"read more\" (WCAG 2.4.4).",
            plural(generic, "link", "links")
        ));
    }
    if !heuristics.landmarks.has_main {
        findings.push(
            "**Add a `<main>` landmark** so assistive technology users can jump straight to the primary content (WCAG 1.3.1, 2.4.1)."
                .to_string(),
        );
    }

    let mut md = String::new();
    let _ = writeln!(md, "# Accessibility Report\n");
    let _ = writeln!(md, "**Page:** {title}  ");
    let _ = writeln!(md, "**URL:** {url}\n");

    if findings.is_empty() {
        let _ = writeln!(md, "## Great Work!\n");
        let _ = writeln!(md, "The automated checks found no critical accessibility issues on this page.\n");
        let _ = writeln!(md, "## Proactive Suggestions\n");
        let _ = writeln!(md, "- Add a skip-navigation link so keyboard users can bypass repeated content.");
        let _ = writeln!(md, "- Test the page with a screen reader (NVDA, JAWS or VoiceOver) to catch what automated checks miss.");
    } else {
        let _ = writeln!(md, "## Key Recommendations\n");
        for finding in &findings {
            let _ = writeln!(md, "- {finding}");
        }
    }

    let _ = write!(md, "\n_Generated from automated heuristics without AI assistance._\n");
    md
}

fn plural(n: u64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessibridge_providers::MockProvider;
    use serde_json::json;

    fn heuristics(value: serde_json::Value) -> HeuristicsReport {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_fallback_lists_triggered_checks_in_order() {
        let h = heuristics(json!({
            "meta": { "url": "https://news.test/a", "title": "Daily News" },
            "images": { "missingAlt": 2 },
            "forms": { "inputsWithoutLabel": 1 },
            "links": { "genericText": 3 },
            "landmarks": { "hasMain": false }
        }));
        let md = fallback_report(&h);
        assert!(md.contains("Daily News"));
        assert!(md.contains("https://news.test/a"));
        assert!(md.contains("## Key Recommendations"));

        let alt = md.find("**Add alt text** to 2 images").unwrap();
        let labels = md.find("**Associate labels** with 1 form input ").unwrap();
        let links = md.find("**Use descriptive link text** for 3 links").unwrap();
        let main = md.find("**Add a `<main>` landmark**").unwrap();
        assert!(alt < labels && labels < links && links < main);
        assert!(!md.contains("Great Work"));
    }

    #[test]
    fn test_fallback_congratulates_clean_page() {
        let h = heuristics(json!({
            "meta": { "url": "https://ok.test", "title": "Fine" },
            "landmarks": { "hasMain": true }
        }));
        let md = fallback_report(&h);
        assert!(md.contains("## Great Work!"));
        assert!(md.contains("skip-navigation"));
        assert!(md.contains("screen reader"));
        assert!(!md.contains("Key Recommendations"));
    }

    #[test]
    fn test_fallback_missing_main_only() {
        let md = fallback_report(&HeuristicsReport::default());
        assert!(md.contains("Untitled page"));
        assert!(md.contains("Unknown URL"));
        assert!(md.contains("`<main>` landmark"));
        assert!(!md.contains("alt text"));
    }

    #[tokio::test]
    async fn test_no_provider_is_fallback() {
        let h = heuristics(json!({
            "meta": { "url": "https://shop.test", "title": "Shop" },
            "images": { "missingAlt": 2 },
            "landmarks": { "hasMain": true }
        }));
        let report = ReportSynthesizer::new(None).synthesize(&h).await;
        assert_eq!(report.source, ReportSource::Fallback);
        assert!(report.ai_error.is_none());
        assert!(report.markdown.contains("**Add alt text** to 2 images"));
        assert!(report.markdown.contains("Shop"));
        assert!(report.markdown.contains("https://shop.test"));
    }

    #[tokio::test]
    async fn test_ai_text_returned_verbatim() {
        let provider = Arc::new(MockProvider::new("mock").with_report_response(Some("## Executive Summary\nAll good.")));
        let report = ReportSynthesizer::new(Some(provider))
            .synthesize(&HeuristicsReport::default())
            .await;
        assert_eq!(report.source, ReportSource::Ai);
        assert_eq!(report.markdown, "## Executive Summary\nAll good.");
    }

    #[tokio::test]
    async fn test_ai_failure_recovers_with_fallback() {
        let provider = Arc::new(MockProvider::new("mock").with_report_response(None));
        let report = ReportSynthesizer::new(Some(provider))
            .synthesize(&HeuristicsReport::default())
            .await;
        assert_eq!(report.source, ReportSource::Fallback);
        assert!(report.markdown.starts_with("# Accessibility Report"));
        assert!(report.ai_error.unwrap().contains("no report response"));
    }
}
