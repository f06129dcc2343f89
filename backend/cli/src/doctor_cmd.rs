//! CLI Doctor Command
//!
//! Explains how the current environment configures the service.

use crate::config::Config;

/// One line of the doctor report.
#[derive(Debug, PartialEq, Eq)]
pub enum Check {
    Ok(String),
    Warn(String),
}

pub fn checks(config: &Config) -> Vec<Check> {
    let mut out = Vec::new();

    if config.ai_enabled() {
        out.push(Check::Ok(format!("OPENROUTER_API_KEY is set (model {})", config.model)));
    } else {
        out.push(Check::Warn(
            "OPENROUTER_API_KEY is missing: alt-text and reports will use deterministic fallbacks".to_string(),
        ));
    }

    match &config.allowed_origin {
        Some(origin) => out.push(Check::Ok(format!("CORS restricted to {origin}"))),
        None => out.push(Check::Warn("ALLOWED_ORIGIN is unset: CORS allows any origin".to_string())),
    }

    out.push(Check::Ok(format!(
        "AI calls time out after {}s; failed images are handled with '{}'",
        config.ai_timeout_secs, config.alt_failure_mode
    )));

    out
}

/// Executes the doctor diagnosis.
pub fn run(config: &Config) {
    println!("\n🔍 Running AccessiBridge Doctor...\n");
    for check in checks(config) {
        match check {
            Check::Ok(msg) => println!("  🟢 {}", msg),
            Check::Warn(msg) => println!("  🟡 {}", msg),
        }
    }
    println!();
}
