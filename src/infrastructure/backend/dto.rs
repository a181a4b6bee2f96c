use serde::{Deserialize, Serialize};

use crate::domain::entities::User;

/// `POST auth/login` body.
#[derive(Serialize)]
pub struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST auth/login` success response.
#[derive(Debug, Deserialize)]
pub struct LoginResponseBody {
    pub token: String,
    pub user: User,
}

/// `GET auth/verify` success response.
#[derive(Debug, Deserialize)]
pub struct VerifyResponseBody {
    pub user: User,
}

/// Error body the backend sends with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
