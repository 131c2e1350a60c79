use async_trait::async_trait;

use crate::db::PgStore;
use crate::stats::{
    dto::SuicidesFilter,
    repo_types::{Resource, SuicideRecord},
};

const SUICIDES_SELECT: &str = r#"
    SELECT s.id, s.id_country, c.name AS country, s.id_stage, st.name AS stage,
           s.year, s.gender, s.suicides_no, s.rate
      FROM suicides s
      JOIN countries c ON c.id_country = s.id_country
      JOIN stages st ON st.id_stage = s.id_stage
"#;

#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn all_suicides(&self) -> anyhow::Result<Vec<SuicideRecord>>;
    async fn suicides_data(&self, filter: &SuicidesFilter) -> anyhow::Result<Vec<SuicideRecord>>;
    async fn all_resources(&self) -> anyhow::Result<Vec<Resource>>;
    async fn resources_by_country(&self, id_country: &str) -> anyhow::Result<Vec<Resource>>;
}

#[async_trait]
impl StatsStore for PgStore {
    async fn all_suicides(&self) -> anyhow::Result<Vec<SuicideRecord>> {
        let sql = format!("{SUICIDES_SELECT} ORDER BY s.year, c.name, s.id");
        let rows = sqlx::query_as::<_, SuicideRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn suicides_data(&self, filter: &SuicidesFilter) -> anyhow::Result<Vec<SuicideRecord>> {
        let sql = format!(
            r#"{SUICIDES_SELECT}
             WHERE ($1::INT  IS NULL OR s.id_stage = $1)
               AND ($2::INT  IS NULL OR s.year >= $2)
               AND ($3::INT  IS NULL OR s.year <= $3)
               AND ($4::TEXT IS NULL OR s.gender = $4)
               AND ($5::TEXT IS NULL OR s.id_country = $5)
             ORDER BY s.year, c.name, s.id"#
        );
        let rows = sqlx::query_as::<_, SuicideRecord>(&sql)
            .bind(filter.id_stage)
            .bind(filter.year_start)
            .bind(filter.year_end)
            .bind(filter.gender.as_deref())
            .bind(filter.id_country.as_deref())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn all_resources(&self) -> anyhow::Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, Resource>(
            r#"
            SELECT id, id_country, name, description, url, phone
              FROM resources
             ORDER BY id_country, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn resources_by_country(&self, id_country: &str) -> anyhow::Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, Resource>(
            r#"
            SELECT id, id_country, name, description, url, phone
              FROM resources
             WHERE id_country = $1
             ORDER BY id
            "#,
        )
        .bind(id_country)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
