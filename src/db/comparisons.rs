use anyhow::{Context, Result};
use chrono::Utc;

use crate::db::{parse_timestamp, FightStore};
use crate::models::{ComparisonUpdate, FighterComparison, NewComparison};

impl FightStore {
    pub async fn insert_comparison(&self, comparison: &NewComparison) -> Result<FighterComparison> {
        let result = sqlx::query(
            r#"
            INSERT INTO fighter_comparisons (
                fighter1_id, fighter2_id, user_id, title, notes,
                created_at, prediction_summary, prediction_score, is_public
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(comparison.fighter1_id)
        .bind(comparison.fighter2_id)
        .bind(comparison.user_id)
        .bind(&comparison.title)
        .bind(&comparison.notes)
        .bind(Utc::now().to_rfc3339())
        .bind(&comparison.prediction_summary)
        .bind(comparison.prediction_score)
        .bind(comparison.is_public)
        .execute(&self.pool)
        .await
        .context("Failed to insert comparison")?;

        let id = result.last_insert_rowid();
        self.get_comparison(id)
            .await?
            .with_context(|| format!("Comparison {} missing after insert", id))
    }

    /// All saved comparisons, newest first
    pub async fn get_comparisons(&self) -> Result<Vec<FighterComparison>> {
        let rows = sqlx::query_as::<_, ComparisonRow>(
            "SELECT * FROM fighter_comparisons ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch comparisons")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_comparison(&self, id: i64) -> Result<Option<FighterComparison>> {
        let row = sqlx::query_as::<_, ComparisonRow>("SELECT * FROM fighter_comparisons WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch comparison")?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn get_comparisons_for_user(&self, user_id: i64) -> Result<Vec<FighterComparison>> {
        let rows = sqlx::query_as::<_, ComparisonRow>(
            r#"
            SELECT * FROM fighter_comparisons
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch comparisons for user")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn update_comparison(
        &self,
        id: i64,
        update: ComparisonUpdate,
    ) -> Result<Option<FighterComparison>> {
        let mut comparison = match self.get_comparison(id).await? {
            Some(comparison) => comparison,
            None => return Ok(None),
        };
        update.apply(&mut comparison);

        sqlx::query(
            r#"
            UPDATE fighter_comparisons SET
                title = ?,
                notes = ?,
                prediction_summary = ?,
                prediction_score = ?,
                is_public = ?
            WHERE id = ?
            "#,
        )
        .bind(&comparison.title)
        .bind(&comparison.notes)
        .bind(&comparison.prediction_summary)
        .bind(comparison.prediction_score)
        .bind(comparison.is_public)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update comparison")?;

        Ok(Some(comparison))
    }

    pub async fn delete_comparison(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM fighter_comparisons WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comparison")?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ComparisonRow {
    id: i64,
    fighter1_id: i64,
    fighter2_id: i64,
    user_id: Option<i64>,
    title: String,
    notes: Option<String>,
    created_at: String,
    prediction_summary: Option<String>,
    prediction_score: Option<i64>,
    is_public: bool,
}

impl From<ComparisonRow> for FighterComparison {
    fn from(row: ComparisonRow) -> Self {
        FighterComparison {
            id: row.id,
            fighter1_id: row.fighter1_id,
            fighter2_id: row.fighter2_id,
            user_id: row.user_id,
            title: row.title,
            notes: row.notes,
            created_at: parse_timestamp(&row.created_at),
            prediction_summary: row.prediction_summary,
            prediction_score: row.prediction_score,
            is_public: row.is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fighters::tests::new_fighter;
    use crate::db::tests::temp_store;
    use crate::models::NewUser;

    #[tokio::test]
    async fn test_comparison_lifecycle() {
        let (store, _dir) = temp_store().await;
        let a = store.insert_fighter(&new_fighter("A")).await.unwrap().id;
        let b = store.insert_fighter(&new_fighter("B")).await.unwrap().id;
        let user = store
            .insert_user(&NewUser {
                username: "fan".to_string(),
                email: "fan@example.com".to_string(),
                display_name: None,
            })
            .await
            .unwrap();

        let saved = store
            .insert_comparison(&NewComparison {
                fighter1_id: a,
                fighter2_id: b,
                user_id: Some(user.id),
                title: "A vs B".to_string(),
                is_public: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(saved.title, "A vs B");

        store
            .insert_comparison(&NewComparison {
                fighter1_id: b,
                fighter2_id: a,
                title: "anonymous".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(store.get_comparisons().await.unwrap().len(), 2);
        let mine = store.get_comparisons_for_user(user.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, saved.id);

        let updated = store
            .update_comparison(
                saved.id,
                ComparisonUpdate {
                    notes: Some("rematch".to_string()),
                    prediction_score: Some(64),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "A vs B");
        assert_eq!(updated.notes.as_deref(), Some("rematch"));
        assert_eq!(updated.prediction_score, Some(64));

        assert!(store.delete_comparison(saved.id).await.unwrap());
        assert!(store.get_comparison(saved.id).await.unwrap().is_none());
    }
}
