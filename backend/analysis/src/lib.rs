//! `accessibridge-analysis`: the deterministic half of AccessiBridge.
//!
//! Everything here is pure and synchronous: WCAG color math, the image URL
//! eligibility predicate, and the issue-count scorer.

pub mod color;
pub mod image_url;
pub mod scorer;

pub use color::{contrast_ratio, hex_to_rgb, relative_luminance, WcagCheck};
pub use image_url::{domain_of, fallback_alt_text, is_valid_image_url, IMAGE_EXTENSIONS};
pub use scorer::{recommendations, score, Recommendations, ScoreReport};
