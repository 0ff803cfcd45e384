use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::time_entry::EmployeeRole;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
}

/// Signed-in user and the bearer token issued for them. Held by the caller and
/// persisted only through a `SessionStore`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, name: String, email: String, role: EmployeeRole) -> Self {
        Self {
            token,
            user: SessionUser {
                id: Uuid::new_v4(),
                name,
                email,
                role,
            },
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == EmployeeRole::Admin
    }

    /// Admins may look at anyone's hours; everyone else only at their own.
    pub fn can_view(&self, employee_name: &str) -> bool {
        self.is_admin() || self.user.name == employee_name
    }
}
