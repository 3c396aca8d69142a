//! Suggestion provider seam and the built-in template provider.

use crate::describe::describe_audience;
use async_trait::async_trait;
use relay_core::types::RuleClause;
use relay_core::RelayResult;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub objective: String,
    pub audience_rules: Vec<RuleClause>,
    pub audience_size: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageTone {
    Friendly,
    Urgent,
    Professional,
    Promotional,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSuggestion {
    pub id: String,
    pub message: String,
    pub tone: MessageTone,
    pub reasoning: String,
}

/// Source of suggested campaign copy. Implementations may call out to a
/// text-generation service; the pipeline only depends on this trait.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> RelayResult<Vec<MessageSuggestion>>;
}

/// Canned suggestions keyed off the audience description. Serves as the
/// development provider and as the fallback when a remote provider fails.
pub struct TemplateSuggestionProvider;

#[async_trait]
impl SuggestionProvider for TemplateSuggestionProvider {
    async fn suggest(&self, request: &SuggestionRequest) -> RelayResult<Vec<MessageSuggestion>> {
        let audience = describe_audience(&request.audience_rules);
        Ok(vec![
            MessageSuggestion {
                id: format!("template_{}", Uuid::new_v4()),
                message: "Hi! Special 15% off just for you. Shop now and save on your favorites! \
                          Use code SAVE15. Valid till midnight!"
                    .into(),
                tone: MessageTone::Friendly,
                reasoning: format!(
                    "Friendly tone works well for customers with {audience}, offering immediate \
                     value with urgency."
                ),
            },
            MessageSuggestion {
                id: format!("template_{}", Uuid::new_v4()),
                message: "URGENT: Limited time offer! Get 20% off your next purchase. Don't miss \
                          out - only 24 hours left! Shop now."
                    .into(),
                tone: MessageTone::Urgent,
                reasoning: "Urgent messaging creates immediate action for this audience segment, \
                            emphasizing scarcity."
                    .into(),
            },
            MessageSuggestion {
                id: format!("template_{}", Uuid::new_v4()),
                message: "Exclusive offer for valued customers: Enjoy 10% off + free shipping on \
                          your next order. Shop premium quality today."
                    .into(),
                tone: MessageTone::Professional,
                reasoning: "Professional tone respects the customer relationship while \
                            highlighting premium value."
                    .into(),
            },
        ])
    }
}

/// Ask `provider` for suggestions, degrading to the templates on failure.
/// Suggestion failures are tolerated by contract: campaign creation
/// proceeds with whatever copy is already at hand.
pub async fn suggest_or_fallback(
    provider: &dyn SuggestionProvider,
    request: &SuggestionRequest,
) -> Vec<MessageSuggestion> {
    match provider.suggest(request).await {
        Ok(suggestions) if !suggestions.is_empty() => suggestions,
        Ok(_) => {
            warn!("suggestion provider returned nothing, using templates");
            template_suggestions(request).await
        }
        Err(e) => {
            warn!(error = %e, "suggestion provider failed, using templates");
            template_suggestions(request).await
        }
    }
}

async fn template_suggestions(request: &SuggestionRequest) -> Vec<MessageSuggestion> {
    TemplateSuggestionProvider
        .suggest(request)
        .await
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::types::{RuleField, RuleOperator};
    use relay_core::RelayError;

    struct FailingProvider;

    #[async_trait]
    impl SuggestionProvider for FailingProvider {
        async fn suggest(
            &self,
            _request: &SuggestionRequest,
        ) -> RelayResult<Vec<MessageSuggestion>> {
            Err(RelayError::Suggestion("provider unreachable".into()))
        }
    }

    fn request() -> SuggestionRequest {
        SuggestionRequest {
            objective: "Win back big spenders".into(),
            audience_rules: vec![RuleClause::new(
                RuleField::Spend,
                RuleOperator::GreaterThan,
                "10000",
            )],
            audience_size: 42,
        }
    }

    #[tokio::test]
    async fn test_template_provider_returns_three_tones() {
        let suggestions = TemplateSuggestionProvider.suggest(&request()).await.unwrap();
        assert_eq!(suggestions.len(), 3);
        let tones: Vec<_> = suggestions.iter().map(|s| s.tone).collect();
        assert!(tones.contains(&MessageTone::Friendly));
        assert!(tones.contains(&MessageTone::Urgent));
        assert!(tones.contains(&MessageTone::Professional));
        // Reasoning references the described audience.
        assert!(suggestions[0].reasoning.contains("total spend greater than 10000"));
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_templates() {
        let suggestions = suggest_or_fallback(&FailingProvider, &request()).await;
        assert_eq!(suggestions.len(), 3);
    }
}
