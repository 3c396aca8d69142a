//! Campaign message copy — audience descriptions and suggested message
//! variants. The remote text-generation transport lives behind
//! [`SuggestionProvider`]; provider failures degrade to the canned
//! templates and never block campaign creation.

pub mod describe;
pub mod provider;

pub use describe::describe_audience;
pub use provider::{
    suggest_or_fallback, MessageSuggestion, MessageTone, SuggestionProvider, SuggestionRequest,
    TemplateSuggestionProvider,
};
