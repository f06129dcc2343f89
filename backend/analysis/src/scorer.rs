//! Issue-count scoring.

use accessibridge_core::IssueCounts;
use serde::Serialize;

/// Points deducted per image missing alt-text.
pub const MISSING_ALT_PENALTY: i64 = 8;
/// Points deducted per contrast failure.
pub const CONTRAST_PENALTY: i64 = 5;

/// `100 - 8*missing_alt - 5*contrast_issues`, clamped to `[0, 100]`.
pub fn score(counts: IssueCounts) -> u8 {
    let raw = 100
        - MISSING_ALT_PENALTY * i64::from(counts.missing_alt)
        - CONTRAST_PENALTY * i64::from(counts.contrast_issues);
    raw.clamp(0, 100) as u8
}

/// One recommendation per issue category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub missing_alt: String,
    pub contrast: String,
}

pub fn recommendations(counts: IssueCounts) -> Recommendations {
    let missing_alt = match counts.missing_alt {
        0 => "Great job! All images have alt text.".to_string(),
        1 => "Add descriptive alt text to 1 image that is missing it.".to_string(),
        n => format!("Add descriptive alt text to {n} images that are missing it."),
    };
    let contrast = match counts.contrast_issues {
        0 => "Great job! No color contrast issues detected.".to_string(),
        1 => "Fix 1 color contrast issue to reach at least 4.5:1 for normal text (WCAG AA).".to_string(),
        n => format!("Fix {n} color contrast issues to reach at least 4.5:1 for normal text (WCAG AA)."),
    };
    Recommendations { missing_alt, contrast }
}

/// Score, echoed counts, and recommendations in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub score: u8,
    pub issues: IssueCounts,
    pub recommendations: Recommendations,
}

impl ScoreReport {
    pub fn new(counts: IssueCounts) -> Self {
        Self {
            score: score(counts),
            issues: counts,
            recommendations: recommendations(counts),
        }
    }
}
