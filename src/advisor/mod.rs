//! The advisory collaborator: turns the transaction snapshot into a critique of the budget by
//! asking a language model. Everything here is stateless; the only entry point most callers need is
//! `analyze`.

mod canned;
mod gemini;
mod prompt;

pub use canned::CannedAdvisor;
pub use gemini::GeminiAdvisor;

use crate::model::Transaction;
use crate::{Config, Result};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};

/// Below this many transactions no analysis is requested, there is too little to say.
pub const MIN_TRANSACTIONS: usize = 3;

/// When this environment variable is set and non-empty, the canned advisor is used and the
/// language model is never contacted.
pub const TEST_MODE_ENV: &str = "SMARTFINANCE_IN_TEST_MODE";

pub const NOT_ENOUGH_DATA: &str = "Please add at least 3 transactions for a meaningful analysis.";
pub const MISSING_API_KEY: &str =
    "The API key was not found. Set GEMINI_API_KEY or pass --api-key to get an analysis.";
pub const NO_RESPONSE: &str = "The model did not return a response.";

/// Something that can answer a prompt with text. Implemented for the real Gemini API and for an
/// offline stand-in.
#[async_trait::async_trait]
pub trait Advisor: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Selects which `Advisor` implementation is used.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the Gemini API.
    #[default]
    Gemini,
    /// Answer with a canned report, without network access.
    Test,
}

impl Mode {
    /// `Mode::Test` when `SMARTFINANCE_IN_TEST_MODE` is set to a non-empty value, otherwise
    /// `Mode::Gemini`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Gemini,
        }
    }

    /// Builds the advisor for this mode from the configured model settings.
    pub fn advisor(&self, config: &Config, api_key: Option<String>) -> Box<dyn Advisor> {
        match self {
            Mode::Gemini => Box::new(GeminiAdvisor::new(
                config.api_base().clone(),
                config.model(),
                api_key,
            )),
            Mode::Test => Box::new(CannedAdvisor::default()),
        }
    }
}

/// Returned by an advisor that needs an API key but was not given one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingApiKey;

impl Display for MissingApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("No API key is configured")
    }
}

impl Error for MissingApiKey {}

/// Produces a markdown critique of `snapshot`. This never fails: every failure is turned into a
/// human-readable message, so the caller can always show the result.
///
/// With fewer than `MIN_TRANSACTIONS` transactions the advisor is not contacted at all.
pub async fn analyze(advisor: &dyn Advisor, snapshot: &[Transaction]) -> String {
    if snapshot.len() < MIN_TRANSACTIONS {
        debug!(
            "Only {} transactions, skipping the analysis request",
            snapshot.len()
        );
        return NOT_ENOUGH_DATA.to_string();
    }

    let prompt = match prompt::build(snapshot) {
        Ok(prompt) => prompt,
        Err(e) => return failure_message(&e),
    };

    match advisor.complete(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("The model returned an empty response");
            NO_RESPONSE.to_string()
        }
        Err(e) if e.is::<MissingApiKey>() => MISSING_API_KEY.to_string(),
        Err(e) => failure_message(&e),
    }
}

fn failure_message(e: &anyhow::Error) -> String {
    warn!("Analysis failed: {e:#}");
    format!("Error while analyzing data: {e:#}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_transactions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and answers with a fixed result.
    struct FakeAdvisor {
        calls: AtomicUsize,
        answer: fn() -> Result<String>,
    }

    impl FakeAdvisor {
        fn new(answer: fn() -> Result<String>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Advisor for FakeAdvisor {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.answer)()
        }
    }

    #[tokio::test]
    async fn test_too_few_transactions_skips_advisor() {
        let advisor = FakeAdvisor::new(|| Ok("unused".to_string()));
        let two: Vec<Transaction> = seed_transactions().into_iter().take(2).collect();
        assert_eq!(NOT_ENOUGH_DATA, analyze(&advisor, &two).await);
        assert_eq!(NOT_ENOUGH_DATA, analyze(&advisor, &[]).await);
        assert_eq!(0, advisor.calls());
    }

    #[tokio::test]
    async fn test_answer_is_returned_verbatim() {
        let advisor = FakeAdvisor::new(|| Ok("## Balance\nAll good.".to_string()));
        let result = analyze(&advisor, &seed_transactions()).await;
        assert_eq!("## Balance\nAll good.", result);
        assert_eq!(1, advisor.calls());
    }

    #[tokio::test]
    async fn test_exactly_three_transactions_is_enough() {
        let advisor = FakeAdvisor::new(|| Ok("ok".to_string()));
        let three: Vec<Transaction> = seed_transactions().into_iter().take(3).collect();
        assert_eq!("ok", analyze(&advisor, &three).await);
        assert_eq!(1, advisor.calls());
    }

    #[tokio::test]
    async fn test_empty_answer() {
        let advisor = FakeAdvisor::new(|| Ok("  \n".to_string()));
        assert_eq!(NO_RESPONSE, analyze(&advisor, &seed_transactions()).await);
    }

    #[tokio::test]
    async fn test_error_becomes_message() {
        let advisor = FakeAdvisor::new(|| Err(anyhow::anyhow!("connection refused")));
        let result = analyze(&advisor, &seed_transactions()).await;
        assert!(result.starts_with("Error while analyzing data:"));
        assert!(result.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_missing_key_message() {
        let advisor = FakeAdvisor::new(|| Err(MissingApiKey.into()));
        assert_eq!(MISSING_API_KEY, analyze(&advisor, &seed_transactions()).await);
    }

    #[tokio::test]
    async fn test_gemini_without_key_reports_missing_key() {
        let advisor = GeminiAdvisor::new(
            "https://generativelanguage.googleapis.com/v1beta/"
                .parse()
                .unwrap(),
            "gemini-2.5-flash",
            None,
        );
        assert_eq!(MISSING_API_KEY, analyze(&advisor, &seed_transactions()).await);
    }

    #[test]
    fn test_mode_default() {
        assert_eq!(Mode::Gemini, Mode::default());
    }
}
