use serde::Serialize;
use sqlx::FromRow;

/// One statistics row joined with its country and stage names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SuicideRecord {
    pub id: i32,
    pub id_country: String,
    pub country: String,
    pub id_stage: i32,
    pub stage: String,
    pub year: i32,
    pub gender: String,
    pub suicides_no: i32,
    pub rate: Option<f64>, // per 100k population
}

/// Help resource (hotline, organization) for a country.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Resource {
    pub id: i32,
    pub id_country: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub phone: Option<String>,
}
