use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub region: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Club {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub genre: Option<String>,
}
