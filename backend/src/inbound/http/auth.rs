//! Identity-claim extraction for authenticated endpoints.
//!
//! The gateway in front of this service verifies the caller's token and
//! forwards the verified claims as headers. Handlers accept an
//! [`AuthContext`] extractor so they never touch raw headers themselves.

use std::future::{Ready, ready};

use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::domain::ports::IdentityClaims;
use crate::domain::{Error, SubjectId};

/// Verified subject identifier forwarded by the auth gateway.
pub const SUBJECT_HEADER: &str = "X-Auth-Subject";
/// Optional display name claim.
pub const NAME_HEADER: &str = "X-Auth-Name";
/// Verified email claim.
pub const EMAIL_HEADER: &str = "X-Auth-Email";

/// Identity claims of the authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthContext {
    claims: IdentityClaims,
}

fn header_value(headers: &HeaderMap, name: &str) -> Result<Option<String>, Error> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| {
        Error::authentication_required(format!("{name} header must be valid UTF-8"))
    })?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}

fn extract_claims(headers: &HeaderMap) -> Result<AuthContext, Error> {
    let subject = header_value(headers, SUBJECT_HEADER)?
        .ok_or_else(|| Error::authentication_required("authentication required"))?;
    let email = header_value(headers, EMAIL_HEADER)?
        .ok_or_else(|| Error::authentication_required("authentication required"))?;
    let name = header_value(headers, NAME_HEADER)?;

    Ok(AuthContext {
        claims: IdentityClaims {
            subject,
            name,
            email,
        },
    })
}

impl AuthContext {
    /// The caller's verified identity claims.
    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    /// Consume the extractor, yielding the claims.
    pub fn into_claims(self) -> IdentityClaims {
        self.claims
    }

    /// The caller's subject as a typed identifier.
    pub fn subject_id(&self) -> Result<SubjectId, Error> {
        SubjectId::new(self.claims.subject.clone())
            .map_err(|err| Error::authentication_required(err.to_string()))
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_claims(req.headers()))
    }
}
