use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, ResponseError, http::StatusCode, web::Data};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{config::Config, data::UserID};

/// The user a request acts for. Authentication happens upstream; the proxy in
/// front of the service puts the user id into a header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserID,
}

#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    #[error("No user on request")]
    Missing,
    #[error("Invalid user id. Only alphanumeric characters, '_' & '-' are allowed")]
    InvalidUserID,
}

impl ResponseError for IdentityError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

static USER_ID: Lazy<Regex> = Lazy::new(|| Regex::new("^[a-zA-Z0-9_-]+$").unwrap());

pub fn is_valid_user_id(id: &str) -> bool {
    USER_ID.is_match(id)
}

impl CurrentUser {
    pub fn from_header(req: &HttpRequest, header: &str) -> Result<Self, IdentityError> {
        let id = req.headers().get(header)
            .and_then(|x| x.to_str().ok())
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .ok_or(IdentityError::Missing)?;
        if is_valid_user_id(id) {
            Ok(CurrentUser { user: UserID(id.to_string()) })
        } else {
            Err(IdentityError::InvalidUserID)
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = IdentityError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = req.app_data::<Data<Config>>()
            .map_or_else(|| Config::default().identity_header, |x| x.identity_header.clone());
        ready(Self::from_header(req, header.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn valid_ids() {
        assert!(is_valid_user_id("acme"));
        assert!(is_valid_user_id("Acme_Co-2"));
        assert!(!is_valid_user_id(""));
        assert!(!is_valid_user_id("../etc/passwd"));
        assert!(!is_valid_user_id("acme co"));
    }

    #[test]
    fn reads_configured_header() {
        let req = TestRequest::default()
            .insert_header(("x-employer-id", "acme"))
            .to_http_request();
        let user = CurrentUser::from_header(&req, "x-employer-id").unwrap();
        assert_eq!(user.user, UserID("acme".to_string()));
        assert!(matches!(CurrentUser::from_header(&req, "x-other"), Err(IdentityError::Missing)));
    }

    #[test]
    fn rejects_path_like_ids() {
        let req = TestRequest::default()
            .insert_header(("x-employer-id", "../acme"))
            .to_http_request();
        assert!(matches!(CurrentUser::from_header(&req, "x-employer-id"), Err(IdentityError::InvalidUserID)));
    }
}
