use crate::ast::Span;
use std::sync::Arc;
use thiserror::Error;

/// Detailed error information with source location
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Span,
    pub source_id: String,
    pub source_text: Arc<str>,
    pub suggestion: Option<String>,
}

impl ErrorDetails {
    fn location(&self) -> String {
        let mut text = self.message.clone();
        if let Some(suggestion) = &self.suggestion {
            text.push_str(&format!(" (suggestion: {})", suggestion));
        }
        format!(
            "{} at {}:{}:{}",
            text, self.source_id, self.span.line, self.span.col
        )
    }
}

/// Error types for the sound change engine
///
/// Only construction problems are errors. A rule that cannot be applied to a
/// word or a language is reported through the message log of an
/// [`Outcome`](crate::Outcome) instead.
#[derive(Debug, Clone, Error)]
pub enum DriftError {
    /// Rule text that does not follow the rule grammar
    #[error("Parse error: {}", .0.location())]
    Parse(Box<ErrorDetails>),

    /// A rule whose parts violate the target/substitution invariant
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// A symbol that does not name any phoneme in the catalog
    #[error("Unknown phoneme '{symbol}' in '{text}'")]
    UnknownPhoneme { symbol: String, text: String },

    /// A word form that could not be built from the change paradigm
    #[error("Cannot build form of '{word}': {reason}")]
    Form { word: String, reason: String },

    /// Engine error without specific source location
    #[error("Engine error: {0}")]
    Engine(String),
}

impl DriftError {
    /// Create a parse error with source information
    pub fn parse(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: None,
        }))
    }

    /// Create a parse error with suggestion
    pub fn parse_with_suggestion(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: Some(suggestion.into()),
        }))
    }

    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::InvalidRule(message.into())
    }

    pub fn form(word: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Form {
            word: word.into(),
            reason: reason.into(),
        }
    }
}
