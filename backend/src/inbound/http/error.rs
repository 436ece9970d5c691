//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and
//! status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::AuthenticationRequired => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::UserNotFound | ErrorCode::CardNotFound | ErrorCode::ReferralNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::DuplicateSlug | ErrorCode::UpdateFailed | ErrorCode::DeleteFailed => {
            StatusCode::CONFLICT
        }
        ErrorCode::TransientError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::SlugValidationFailed
        | ErrorCode::VerificationFailed
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use rstest::rstest;

    use super::*;
    use crate::domain::validation::FieldErrors;

    #[rstest]
    #[case(Error::authentication_required("sign in"), StatusCode::UNAUTHORIZED)]
    #[case(Error::user_not_found("no user"), StatusCode::NOT_FOUND)]
    #[case(Error::card_not_found("no card"), StatusCode::NOT_FOUND)]
    #[case(Error::referral_not_found("no referral"), StatusCode::NOT_FOUND)]
    #[case(Error::forbidden("not yours"), StatusCode::FORBIDDEN)]
    #[case(Error::duplicate_slug("taken"), StatusCode::CONFLICT)]
    #[case(Error::update_failed("lost"), StatusCode::CONFLICT)]
    #[case(Error::delete_failed("lost"), StatusCode::CONFLICT)]
    #[case(Error::transient("timeout"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::slug_validation_failed("bad base"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(Error::verification_failed("gone"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_codes_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn validation_failures_map_to_bad_request() {
        let mut fields = FieldErrors::new();
        fields.insert("name".to_owned(), "Card name is required".to_owned());
        let error = Error::validation_failed(&fields);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_are_redacted() {
        let redacted = redact_if_internal(&Error::internal("connection string leaked"));
        assert_eq!(redacted.message(), "Internal server error");
    }

    #[test]
    fn non_internal_errors_keep_their_message() {
        let kept = redact_if_internal(&Error::forbidden("you can only edit your own cards"));
        assert_eq!(kept.message(), "you can only edit your own cards");
    }
}
