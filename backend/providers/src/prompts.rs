//! Prompt text sent to the AI service.

use anyhow::{Context, Result};

use accessibridge_core::HeuristicsReport;

pub const ALT_TEXT_INSTRUCTION: &str =
    "Generate a concise alt text (<100 chars), describe the main subject clearly.";

pub const REPORT_SYSTEM_PROMPT: &str = "You are an expert web accessibility auditor \
specialising in WCAG 2.2 Level AA. You review automated page heuristics and explain \
the findings to developers and content authors in clear, practical, encouraging language.";

/// User prompt asking for the five report sections, with the heuristics embedded as JSON.
pub fn report_user_prompt(heuristics: &HeuristicsReport) -> Result<String> {
    let context = serde_json::to_string_pretty(heuristics)
        .context("Failed to serialize heuristics for the report prompt")?;

    Ok(format!(
        "Write an accessibility report in Markdown for the page described by the \
heuristics below. Use exactly these sections:\n\
1. Executive Summary - two or three sentences on overall accessibility.\n\
2. Strengths - what the page already does well.\n\
3. Priority Fixes - the most impactful WCAG 2.2 AA issues, each with the relevant success criterion.\n\
4. Recommendations - concrete next steps, ordered by effort.\n\
5. Encouragement - a short motivating closing note.\n\n\
Heuristics (JSON):\n```json\n{context}\n```"
    ))
}
