//! Company Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Company ID type
pub type CompanyId = RecordId;

/// Company model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CompanyId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Company {
    pub fn new(name: String, now: i64) -> Self {
        Self {
            id: None,
            name,
            email: None,
            phone: None,
            address: None,
            logo_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
