use async_trait::async_trait;

use crate::db::PgStore;
use crate::testimonials::repo_types::Testimonial;

#[async_trait]
pub trait TestimonialStore: Send + Sync {
    /// Newest first.
    async fn list(&self) -> anyhow::Result<Vec<Testimonial>>;
    /// Returns `None` when the author does not exist.
    async fn create(&self, id_user: i32, text: &str) -> anyhow::Result<Option<Testimonial>>;
}

#[async_trait]
impl TestimonialStore for PgStore {
    async fn list(&self) -> anyhow::Result<Vec<Testimonial>> {
        let rows = sqlx::query_as::<_, Testimonial>(
            r#"
            SELECT t.id, t.id_user, u.username, t.testimonial, t.created_at
              FROM testimonials t
              JOIN users u ON u.id = t.id_user
             ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, id_user: i32, text: &str) -> anyhow::Result<Option<Testimonial>> {
        let row = sqlx::query_as::<_, Testimonial>(
            r#"
            WITH inserted AS (
                INSERT INTO testimonials (id_user, testimonial)
                SELECT id, $2 FROM users WHERE id = $1
                RETURNING id, id_user, testimonial, created_at
            )
            SELECT i.id, i.id_user, u.username, i.testimonial, i.created_at
              FROM inserted i
              JOIN users u ON u.id = i.id_user
            "#,
        )
        .bind(id_user)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
