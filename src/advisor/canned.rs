//! An `Advisor` that never leaves the process. It is selected with `SMARTFINANCE_IN_TEST_MODE` so
//! the `advise` command can be exercised end to end without an API key.

use crate::advisor::Advisor;
use crate::Result;
use std::sync::Mutex;
use tracing::debug;

const DEFAULT_RESPONSE: &str = "## Budget analysis\n\n\
This report was produced offline, no model was contacted.\n\n\
1. Keep fixed expenses below half of your income.\n\
2. Move small catch-all spending into a named category.\n\
3. Put part of every income into the reserve fund.\n";

/// Answers every prompt with the same text and remembers the prompts it received.
#[derive(Debug)]
pub struct CannedAdvisor {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl Default for CannedAdvisor {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE)
    }
}

impl CannedAdvisor {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// The prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        match self.prompts.lock() {
            Ok(prompts) => prompts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait::async_trait]
impl Advisor for CannedAdvisor {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Answering a {} byte prompt with the canned response", prompt.len());
        match self.prompts.lock() {
            Ok(mut prompts) => prompts.push(prompt.to_string()),
            Err(poisoned) => poisoned.into_inner().push(prompt.to_string()),
        }
        Ok(self.response.clone())
    }
}
