use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cor", default)]
    pub color: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(rename = "acabamento", default)]
    pub finish: Option<String>,
    #[serde(rename = "unidade", default)]
    pub unit: Option<String>,
    #[serde(rename = "ativo", default = "super::default_true")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}
