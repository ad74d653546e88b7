//! Schema validation for acknowledgement payloads.
//!
//! The action tag is checked first; an unknown tag yields a single `action` issue. Otherwise all
//! per-variant field issues are collected so the error text names every offending field.

use thiserror::Error;

use crate::types::{AckAction, AckPayload};

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Wire name of the field (`userId`, `action`, `code`, `amount`).
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Payload rejected by [`AckPayload::validate`]; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid action payload: {}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// True if any issue concerns `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AckPayload {
    /// Checks the tagged-union schema and returns the typed action.
    pub fn validate(&self) -> Result<AckAction, ValidationError> {
        let kind = match self.action.as_deref() {
            Some(kind @ ("start" | "purchase")) => kind,
            Some(other) => {
                return Err(ValidationError {
                    issues: vec![FieldIssue::new(
                        "action",
                        format!("Invalid discriminator value '{other}'. Expected 'start' | 'purchase'"),
                    )],
                })
            }
            None => {
                return Err(ValidationError {
                    issues: vec![FieldIssue::new(
                        "action",
                        "Required. Expected 'start' | 'purchase'",
                    )],
                })
            }
        };

        let mut issues = Vec::new();
        if self.user_id.is_none() {
            issues.push(FieldIssue::new("userId", "Required"));
        }

        match kind {
            "start" => {
                if self.code.is_none() {
                    issues.push(FieldIssue::new("code", "Required"));
                }
            }
            _ => match self.amount {
                None => issues.push(FieldIssue::new("amount", "Required")),
                Some(amount) if !amount.is_finite() => {
                    issues.push(FieldIssue::new("amount", "Expected a finite number"))
                }
                Some(amount) if amount <= 0.0 => {
                    issues.push(FieldIssue::new("amount", "Number must be greater than 0"))
                }
                Some(_) => {}
            },
        }

        let username = self.username.clone();
        match (self.user_id, kind, &self.code, self.amount) {
            (Some(user_id), "start", Some(code), _) if issues.is_empty() => {
                Ok(AckAction::start(user_id, username, code.clone()))
            }
            (Some(user_id), "purchase", _, Some(amount)) if issues.is_empty() => {
                Ok(AckAction::purchase(user_id, username, amount))
            }
            _ => Err(ValidationError { issues }),
        }
    }
}
