//! Explicit session context for hospital staff.
//!
//! Created at login and dropped at logout. Operations that need to know who
//! is acting take a `&SessionContext` parameter; there is no global store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Doctor,
    ConsentOfficer,
}

/// The authenticated hospital user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalUser {
    pub id: String,
    pub email: String,
    pub role: StaffRole,
    pub hospital_name: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    user: HospitalUser,
    started_at: DateTime<Utc>,
}

impl SessionContext {
    /// Begin a session for a user who has already been authenticated by the
    /// external identity provider.
    pub fn login(user: HospitalUser) -> Self {
        Self { user, started_at: Utc::now() }
    }

    pub fn user(&self) -> &HospitalUser {
        &self.user
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// End the session, handing back the user it was opened for.
    pub fn logout(self) -> HospitalUser {
        self.user
    }
}
