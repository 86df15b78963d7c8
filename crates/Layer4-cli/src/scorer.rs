//! Scorer wiring

use std::sync::Arc;
use tracing::info;
use trimctx_core::HeuristicScorer;
use trimctx_foundation::{Error, ScorerKind, ScorerSettings, SelfInfoScorer};
use trimctx_provider::OpenAiCompatScorer;

/// Scorer selected by the settings
pub fn build_scorer(settings: &ScorerSettings) -> Result<Arc<dyn SelfInfoScorer>, Error> {
    match settings.kind_or_default() {
        ScorerKind::Heuristic => Ok(Arc::new(HeuristicScorer::new())),
        ScorerKind::OpenAi => {
            let scorer = OpenAiCompatScorer::from_settings(settings)?;
            info!(
                "Scoring with {} at {}",
                scorer.model(),
                scorer.endpoint()
            );
            Ok(Arc::new(scorer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_heuristic() {
        let scorer = build_scorer(&ScorerSettings::default()).unwrap();
        assert_eq!(scorer.name(), "heuristic");
    }

    #[test]
    fn test_openai_scorer() {
        let settings = ScorerSettings {
            kind: Some(ScorerKind::OpenAi),
            model: Some("gpt2".into()),
            base_url: Some("http://localhost:8000/v1".into()),
            ..Default::default()
        };
        let scorer = build_scorer(&settings).unwrap();
        assert_eq!(scorer.name(), "openai");
    }
}
