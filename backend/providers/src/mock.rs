use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;

use accessibridge_core::{AssistProvider, HeuristicsReport};

/// A provider that returns canned responses, for tests and offline demos.
pub struct MockProvider {
    name: String,
    alt_response: Option<String>,
    report_response: Option<String>,
    failing_urls: HashSet<String>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alt_response: Some("Mock description".to_string()),
            report_response: Some("# Mock report".to_string()),
            failing_urls: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Alt-text returned for every image. `None` makes every alt call fail.
    pub fn with_alt_response(mut self, response: Option<&str>) -> Self {
        self.alt_response = response.map(str::to_string);
        self
    }

    /// Report text. `None` makes every report call fail.
    pub fn with_report_response(mut self, response: Option<&str>) -> Self {
        self.report_response = response.map(str::to_string);
        self
    }

    /// Make alt calls for this URL fail.
    pub fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.failing_urls.insert(url.into());
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssistProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn generate_alt_text(&self, image_url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_urls.contains(image_url) {
            bail!("mock failure for {}", image_url);
        }
        match &self.alt_response {
            Some(text) => Ok(text.clone()),
            None => bail!("mock provider has no alt response"),
        }
    }

    async fn generate_report(&self, _heuristics: &HeuristicsReport) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.report_response {
            Some(text) => Ok(text.clone()),
            None => bail!("mock provider has no report response"),
        }
    }
}
