//! Divination request value object

use super::kind::DivinationKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A submission to one of the oracles (Value Object)
///
/// Built fresh for every submission and never mutated afterwards. The
/// constructors enforce the submission rule: the question must not be blank,
/// unless the kind is [`DivinationKind::Astrology`] and a birth date (carried
/// as context) was supplied instead.
///
/// Deserialization goes through the same validation as [`try_new`](Self::try_new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RequestFields")]
pub struct DivinationRequest {
    kind: DivinationKind,
    user_text: String,
    context: Option<String>,
}

/// Unvalidated wire shape of a [`DivinationRequest`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestFields {
    kind: DivinationKind,
    #[serde(default)]
    user_text: String,
    #[serde(default)]
    context: Option<String>,
}

impl TryFrom<RequestFields> for DivinationRequest {
    type Error = DomainError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        Self::try_new(fields.kind, fields.user_text, fields.context)
    }
}

impl DivinationRequest {
    /// Validate and build a request.
    ///
    /// Blank context is treated as absent.
    pub fn try_new(
        kind: DivinationKind,
        user_text: impl Into<String>,
        context: Option<String>,
    ) -> Result<Self, DomainError> {
        let user_text = user_text.into();
        let context = context.filter(|c| !c.trim().is_empty());

        if user_text.trim().is_empty() {
            match (kind.accepts_birth_date(), &context) {
                (true, Some(_)) => {}
                (true, None) => return Err(DomainError::MissingBirthDate),
                (false, _) => return Err(DomainError::EmptyQuestion),
            }
        }

        Ok(Self {
            kind,
            user_text,
            context,
        })
    }

    /// Build a request from the page form: question plus optional birth date.
    ///
    /// The birth date only becomes context for kinds that accept one.
    pub fn with_birth_date(
        kind: DivinationKind,
        user_text: impl Into<String>,
        birth_date: Option<&str>,
    ) -> Result<Self, DomainError> {
        let context = birth_date
            .map(str::trim)
            .filter(|d| kind.accepts_birth_date() && !d.is_empty())
            .map(|d| format!("用户出生日期: {}", d));
        Self::try_new(kind, user_text, context)
    }

    pub fn kind(&self) -> DivinationKind {
        self.kind
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}
