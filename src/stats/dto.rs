use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Raw query string of `/data`. Empty values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SuicidesQuery {
    pub id_stage: Option<String>,
    pub year_start: Option<String>,
    pub year_end: Option<String>,
    pub gender: Option<String>,
    pub id_country: Option<String>,
}

/// Validated filter; every `None` matches all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuicidesFilter {
    pub id_stage: Option<i32>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub gender: Option<String>,
    pub id_country: Option<String>,
}

fn present(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn int_param(name: &str, v: Option<String>) -> Result<Option<i32>, AppError> {
    present(v)
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| AppError::validation(format!("{} must be an integer", name)))
        })
        .transpose()
}

impl TryFrom<SuicidesQuery> for SuicidesFilter {
    type Error = AppError;

    fn try_from(q: SuicidesQuery) -> Result<Self, Self::Error> {
        let filter = SuicidesFilter {
            id_stage: int_param("id_stage", q.id_stage)?,
            year_start: int_param("year_start", q.year_start)?,
            year_end: int_param("year_end", q.year_end)?,
            gender: present(q.gender).map(|g| g.to_lowercase()),
            id_country: present(q.id_country).map(|c| c.to_uppercase()),
        };
        if let (Some(start), Some(end)) = (filter.year_start, filter.year_end) {
            if start > end {
                return Err(AppError::validation(
                    "year_start must not be greater than year_end",
                ));
            }
        }
        Ok(filter)
    }
}

/// Body of a rejected resource lookup.
#[derive(Debug, Serialize)]
pub struct InvalidIdResponse {
    pub error: &'static str,
    pub id: String,
}
