use std::{fmt, str::FromStr};

use strum::Display;
use thiserror::Error;

use crate::utils::sanitize::{sanitize_email, sanitize_text_field};

use super::{types::UtcDateTime, CollabType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub collab_type: CollabType,
    pub job_title: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub created_at: UtcDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSubmission {
    pub collab_type: CollabType,
    pub job_title: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

/// Raw values of the collaboration form, as received.
#[derive(Debug, Default)]
pub struct SubmissionFields {
    pub collab_type: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Field {
    #[strum(serialize = "Type")]
    Type,
    #[strum(serialize = "Job title")]
    JobTitle,
    #[strum(serialize = "Company")]
    Company,
    #[strum(serialize = "Phone")]
    Phone,
    #[strum(serialize = "Email")]
    Email,
}

impl Field {
    pub fn max_length(&self) -> usize {
        use Field::*;

        match self {
            Type | Phone => 50,
            JobTitle | Company | Email => 255,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Missing(Field),
    #[error("{field} must be at most {max} characters long.")]
    TooLong { field: Field, max: usize },
    #[error("`{0}` is not a known collaborator type.")]
    UnknownType(String),
    #[error("Email address is not valid.")]
    InvalidEmail,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&messages)
    }
}

impl NewSubmission {
    /// Sanitizes and validates the raw form values.
    ///
    /// Every field is checked, so the error lists all problems at once.
    pub fn from_fields(fields: SubmissionFields) -> Result<NewSubmission, ValidationErrors> {
        let mut errors = Vec::new();

        let collab_type = required_text(Field::Type, fields.collab_type, &mut errors).and_then(
            |value| match CollabType::from_str(&value) {
                Ok(collab_type) => Some(collab_type),
                Err(_) => {
                    errors.push(ValidationError::UnknownType(value));
                    None
                }
            },
        );
        let job_title = required_text(Field::JobTitle, fields.job_title, &mut errors);
        let company = required_text(Field::Company, fields.company, &mut errors);
        let phone = required_text(Field::Phone, fields.phone, &mut errors);
        let email = required_email(fields.email, &mut errors);

        match (collab_type, job_title, company, phone, email) {
            (Some(collab_type), Some(job_title), Some(company), Some(phone), Some(email)) => {
                Ok(NewSubmission {
                    collab_type,
                    job_title,
                    company,
                    phone,
                    email,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}

fn required_text(
    field: Field,
    raw: Option<String>,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    let value = sanitize_text_field(raw.as_deref().unwrap_or_default());
    check_length(field, value, errors)
}

fn required_email(raw: Option<String>, errors: &mut Vec<ValidationError>) -> Option<String> {
    let raw = raw.unwrap_or_default();

    if raw.trim().is_empty() {
        errors.push(ValidationError::Missing(Field::Email));
        return None;
    }

    match sanitize_email(&raw) {
        Some(email) => check_length(Field::Email, email, errors),
        None => {
            errors.push(ValidationError::InvalidEmail);
            None
        }
    }
}

fn check_length(field: Field, value: String, errors: &mut Vec<ValidationError>) -> Option<String> {
    if value.is_empty() {
        errors.push(ValidationError::Missing(field));
        return None;
    }

    let max = field.max_length();
    if value.chars().count() > max {
        errors.push(ValidationError::TooLong { field, max });
        return None;
    }

    Some(value)
}
