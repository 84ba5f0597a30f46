use crate::advisor::{self, Mode};
use crate::args::AdviseArgs;
use crate::commands::{open_store, Out};
use crate::{Config, Result};
use tracing::debug;

/// Asks the advisor for a critique of the current collection. The analysis, or the reason there is
/// none, is the message; this command only fails if the configuration cannot be used.
pub async fn advise(config: &Config, mode: Mode, args: &AdviseArgs) -> Result<Out<String>> {
    let store = open_store(config);
    debug!("Requesting an analysis in {mode:?} mode");
    let advisor = mode.advisor(config, args.api_key().map(String::from));
    let analysis = advisor::analyze(advisor.as_ref(), store.snapshot()).await;
    Ok(Out::new(analysis.clone(), analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{MISSING_API_KEY, NOT_ENOUGH_DATA};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_advise_test_mode() {
        let env = TestEnv::new().await;
        let out = advise(&env.config(), Mode::Test, &AdviseArgs::new(None))
            .await
            .unwrap();
        assert!(out.message().starts_with("## Budget analysis"));
    }

    #[tokio::test]
    async fn test_advise_without_key() {
        let env = TestEnv::new().await;
        let out = advise(&env.config(), Mode::Gemini, &AdviseArgs::new(None))
            .await
            .unwrap();
        assert_eq!(MISSING_API_KEY, out.message());
    }

    #[tokio::test]
    async fn test_advise_too_few_transactions() {
        let env = TestEnv::new().await;
        let examples = env.store().snapshot()[..2].to_vec();
        env.write_transactions(&examples);
        // Not contacted, so the missing key does not matter.
        let out = advise(&env.config(), Mode::Gemini, &AdviseArgs::new(None))
            .await
            .unwrap();
        assert_eq!(NOT_ENOUGH_DATA, out.message());
    }
}
