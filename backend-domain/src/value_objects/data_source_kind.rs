// Provenance tag carried by every response

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Database,
    Mock,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Database => "database",
            DataSourceKind::Mock => "mock",
        }
    }
}

impl From<&str> for DataSourceKind {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "database" => DataSourceKind::Database,
            _ => DataSourceKind::Mock,
        }
    }
}
