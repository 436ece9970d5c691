//! Field-level validation for card submissions.
//!
//! Pure functions with no I/O: input is the candidate submission, output is
//! a map of field name to human-readable message. An empty map means the
//! submission is valid. Required string fields are trimmed before length
//! checks.

use std::collections::BTreeMap;

use url::Url;

use crate::domain::card::CardFields;

/// Field name to human-readable error message.
pub type FieldErrors = BTreeMap<String, String>;

/// Bounds for the card name length.
pub const NAME_MIN: usize = 3;
/// Upper bound for the card name length.
pub const NAME_MAX: usize = 100;
/// Lower bound for the benefits description length.
pub const BENEFITS_MIN: usize = 50;
/// Upper bound for the benefits description length.
pub const BENEFITS_MAX: usize = 2000;
/// Suggested upper bound for fee fields.
pub const FEE_MAX: f64 = 10_000.0;

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors.insert(field.to_owned(), message.to_owned());
}

/// Return `true` when `value` parses as an absolute URL with an `http` or
/// `https` scheme.
pub fn is_valid_referral_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Validate a candidate submission, returning per-field messages.
pub fn validate_submission(fields: &CardFields) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name = fields.name.trim();
    if name.is_empty() {
        push(&mut errors, "name", "Card name is required");
    } else if name.chars().count() < NAME_MIN {
        push(&mut errors, "name", "Card name must be at least 3 characters");
    } else if name.chars().count() > NAME_MAX {
        push(&mut errors, "name", "Card name must be less than 100 characters");
    }

    if fields.bank.trim().is_empty() {
        push(&mut errors, "bank", "Bank selection is required");
    }

    if fields.category.trim().is_empty() {
        push(&mut errors, "category", "Category selection is required");
    }

    if fields.eligibility.trim().is_empty() {
        push(&mut errors, "eligibility", "Eligibility selection is required");
    }

    let benefits = fields.benefits.trim();
    if benefits.is_empty() {
        push(&mut errors, "benefits", "Benefits description is required");
    } else if benefits.chars().count() < BENEFITS_MIN {
        push(
            &mut errors,
            "benefits",
            "Benefits description must be at least 50 characters",
        );
    } else if benefits.chars().count() > BENEFITS_MAX {
        push(
            &mut errors,
            "benefits",
            "Benefits description must be less than 2000 characters",
        );
    }

    let referral_url = fields.referral_url.trim();
    if referral_url.is_empty() {
        push(&mut errors, "referralUrl", "Referral URL is required");
    } else if !is_valid_referral_url(referral_url) {
        push(
            &mut errors,
            "referralUrl",
            "Referral URL must be an absolute HTTP or HTTPS URL",
        );
    }

    if let Some(fee) = fields.joining_fee
        && !(0.0..=FEE_MAX).contains(&fee)
    {
        push(
            &mut errors,
            "joiningFee",
            "Joining fee must be between 0 and 10000",
        );
    }

    if let Some(fee) = fields.annual_fee
        && !(0.0..=FEE_MAX).contains(&fee)
    {
        push(
            &mut errors,
            "annualFee",
            "Annual fee must be between 0 and 10000",
        );
    }

    errors
}
