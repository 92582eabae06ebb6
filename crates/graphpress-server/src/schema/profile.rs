//! Profile request/response types.

use graphpress_core::AttributeMap;
use serde::{Deserialize, Serialize};

/// Query parameters of `/getProfile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetProfileParams {
    pub id: Option<String>,
}

/// Response of `/getProfile`: every attribute except the password.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub profile: AttributeMap,
}

/// Query parameters of `/setProfile`. Any subset may be given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetProfileParams {
    pub username: Option<String>,
    pub birthday: Option<String>,
    pub avatar: Option<String>,
    pub about: Option<String>,
}
