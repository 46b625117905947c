use care_dashboard_data::models::{UserRecord, VhvRecord};
use crate::entities::directory::{User, Vhv};
use serde_json::Map;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert from data model to domain entity for a user
pub fn convert_to_domain_user(record: UserRecord) -> User {
    User {
        id: record.id,
        email: record.email,
        full_name: record.full_name,
        role: record.role,
        phone: record.phone,
        created_at: record.created_at,
        extra: Map::new(),
    }
}

/// Convert from data model to domain entity for a volunteer
pub fn convert_to_domain_vhv(record: VhvRecord) -> Vhv {
    Vhv {
        id: record.id,
        user_id: record.user_id,
        full_name: record.full_name,
        phone: record.phone,
        village: record.village,
        district: record.district,
        status: record.status,
        created_at: record.created_at,
        extra: Map::new(),
    }
}

/// Convert from domain entity to data model for a user
pub fn convert_to_data_user(user: &User) -> UserRecord {
    UserRecord {
        id: user.id.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: user.role.clone(),
        phone: user.phone.clone(),
        created_at: user.created_at.clone(),
    }
}

/// Convert from domain entity to data model for a volunteer
pub fn convert_to_data_vhv(vhv: &Vhv) -> VhvRecord {
    VhvRecord {
        id: vhv.id.clone(),
        user_id: vhv.user_id.clone(),
        full_name: vhv.full_name.clone(),
        phone: vhv.phone.clone(),
        village: vhv.village.clone(),
        district: vhv.district.clone(),
        status: vhv.status.clone(),
        created_at: vhv.created_at.clone(),
    }
}
