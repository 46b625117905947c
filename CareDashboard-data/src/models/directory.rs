use serde::{Deserialize, Serialize};

/// Storage model for an application user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier of the user
    pub id: String,

    /// Login email address
    pub email: Option<String>,

    /// Display name
    pub full_name: Option<String>,

    /// Role name as stored (admin, doctor, patient, vhv)
    pub role: String,

    /// Contact phone number
    pub phone: Option<String>,

    /// Creation timestamp (RFC 3339)
    pub created_at: Option<String>,
}

/// Storage model for a Village Health Volunteer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VhvRecord {
    /// Unique identifier of the volunteer
    pub id: String,

    /// Linked user account, if the volunteer can sign in
    pub user_id: Option<String>,

    /// Volunteer name
    pub full_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Village the volunteer serves
    pub village: Option<String>,

    /// District the village belongs to
    pub district: Option<String>,

    /// Activity status (e.g. active, inactive)
    pub status: Option<String>,

    /// Creation timestamp (RFC 3339)
    pub created_at: Option<String>,
}
