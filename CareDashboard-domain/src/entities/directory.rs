use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Roles recognised by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator
    Admin,
    /// Doctor
    Doctor,
    /// Patient
    Patient,
    /// Village Health Volunteer
    Vhv,
}

impl UserRole {
    /// Lower-case role name as it appears in tokens and records
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Doctor => "doctor",
            UserRole::Patient => "patient",
            UserRole::Vhv => "vhv",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "doctor" => Ok(UserRole::Doctor),
            "patient" => Ok(UserRole::Patient),
            "vhv" | "village_health_volunteer" => Ok(UserRole::Vhv),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// An application user as returned by the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct User {
    /// Unique identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Login email address
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,
    /// Role name (admin, doctor, patient, vhv)
    pub role: String,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Columns not modeled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Parsed role, if the stored role name is one the dashboard knows
    pub fn parsed_role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }
}

/// A Village Health Volunteer as returned by the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Vhv {
    /// Unique identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Linked user account
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    /// Volunteer name
    #[serde(default)]
    pub full_name: Option<String>,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Village served
    #[serde(default)]
    pub village: Option<String>,
    /// District of the village
    #[serde(default)]
    pub district: Option<String>,
    /// Activity status
    #[serde(default)]
    pub status: Option<String>,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Columns not modeled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

// Identifier columns may be bigint in hosted tables
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(" doctor ".parse::<UserRole>().unwrap(), UserRole::Doctor);
        assert_eq!("village_health_volunteer".parse::<UserRole>().unwrap(), UserRole::Vhv);
        assert!("nurse".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Vhv.to_string(), "vhv");
    }

    #[test]
    fn test_vhv_accepts_numeric_ids_and_keeps_extra_columns() {
        let vhv: Vhv = serde_json::from_value(json!({
            "id": 42,
            "user_id": null,
            "full_name": "Somchai",
            "village": "Ban Nong",
            "households_covered": 18
        })).unwrap();

        assert_eq!(vhv.id, "42");
        assert_eq!(vhv.user_id, None);
        assert_eq!(vhv.village.as_deref(), Some("Ban Nong"));
        assert_eq!(vhv.phone, None);
        assert_eq!(vhv.extra.get("households_covered"), Some(&json!(18)));

        let round_trip = serde_json::to_value(&vhv).unwrap();
        assert_eq!(round_trip["households_covered"], 18);
    }

    #[test]
    fn test_null_name_and_email_are_accepted() {
        let user: User = serde_json::from_value(json!({
            "id": "u2",
            "email": null,
            "role": "patient"
        })).unwrap();
        assert_eq!(user.email, None);

        let vhv: Vhv = serde_json::from_value(json!({
            "id": "v1",
            "full_name": null
        })).unwrap();
        assert_eq!(vhv.full_name, None);
        assert!(vhv.extra.is_empty());
    }

    #[test]
    fn test_user_parsed_role() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "vhv@example.org",
            "role": "VHV"
        })).unwrap();

        assert_eq!(user.parsed_role(), Some(UserRole::Vhv));
        assert_eq!(user.full_name, None);
    }
}
