use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "operador")]
    Operator,
    #[serde(rename = "visualizador")]
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(rename = "nome", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "papel")]
    pub role: ProfileRole,
}

impl Profile {
    pub fn can_write(&self) -> bool {
        matches!(self.role, ProfileRole::Admin | ProfileRole::Operator)
    }
}
