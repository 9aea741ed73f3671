use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    #[serde(rename = "tabela")]
    pub table: String,
    #[serde(rename = "acao")]
    pub action: String,
    #[serde(rename = "registro_id", default)]
    pub record_id: Option<String>,
    #[serde(rename = "usuario_id", default)]
    pub user_id: Option<Uuid>,
    #[serde(rename = "dados", default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}
