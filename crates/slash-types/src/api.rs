use serde::{Deserialize, Serialize};

use crate::models::{OpenGraphMetadata, Role, Shortcut, Visibility};

// -- JWT Claims --

/// JWT claims issued by the auth endpoints and checked by the API
/// middleware. `sub` is the numeric user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by both register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: i32,
    pub role: Role,
    pub token: String,
}

// -- Shortcuts --

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateShortcutRequest {
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub og_metadata: Option<OpenGraphMetadata>,
}

/// Partial update of the shortcut named in the request path.
///
/// Only the fields listed in `update_mask` are applied; every other field
/// is ignored whatever its value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateShortcutRequest {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub og_metadata: Option<OpenGraphMetadata>,
    #[serde(default)]
    pub update_mask: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListShortcutsResponse {
    pub shortcuts: Vec<Shortcut>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortcutResponse {
    pub shortcut: Shortcut,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteShortcutResponse {}
