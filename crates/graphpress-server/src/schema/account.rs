//! Account request types. Responses reuse [`super::common::IdResponse`].

use serde::Deserialize;

/// Query parameters of `/signup`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupParams {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Query parameters of `/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginParams {
    pub username: Option<String>,
    pub password: Option<String>,
}
