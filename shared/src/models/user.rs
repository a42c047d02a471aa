//! Backend session models

use serde::{Deserialize, Serialize};

/// Functional id the backend assigns to administrators
pub const ADMIN_FUNCTIONAL_ID: &str = "ADM";

/// Role derived from the login response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Standard,
}

impl Role {
    pub fn from_functional_id(id: &str) -> Self {
        if id == ADMIN_FUNCTIONAL_ID {
            Role::Admin
        } else {
            Role::Standard
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "administrador"),
            Role::Standard => write!(f, "usuari estàndard"),
        }
    }
}

/// Login response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "funcionalId", default)]
    pub functional_id: String,
}

/// An authenticated backend session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            role: Role::from_functional_id(&response.functional_id),
            token: response.token,
        }
    }
}
