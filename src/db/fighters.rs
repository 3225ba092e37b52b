use anyhow::{Context, Result};

use crate::db::FightStore;
use crate::models::{Fighter, NewFighter};

impl FightStore {
    /// Insert a roster entry and return it with its id
    pub async fn insert_fighter(&self, fighter: &NewFighter) -> Result<Fighter> {
        let record = if fighter.record.trim().is_empty() {
            format!("{}-{}-{}", fighter.wins, fighter.losses, fighter.draws)
        } else {
            fighter.record.clone()
        };

        let result = sqlx::query(
            r#"
            INSERT INTO fighters (
                name, nickname, division, record,
                wins, losses, draws,
                age, height, reach, stance, team, image, style, ranking,
                strikes_landed_per_min, striking_accuracy, takedown_accuracy, takedown_defense,
                wins_by_ko, wins_by_sub, wins_by_dec
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fighter.name)
        .bind(&fighter.nickname)
        .bind(&fighter.division)
        .bind(&record)
        .bind(fighter.wins)
        .bind(fighter.losses)
        .bind(fighter.draws)
        .bind(fighter.age)
        .bind(&fighter.height)
        .bind(&fighter.reach)
        .bind(&fighter.stance)
        .bind(&fighter.team)
        .bind(&fighter.image)
        .bind(&fighter.style)
        .bind(fighter.ranking)
        .bind(fighter.strikes_landed_per_min)
        .bind(fighter.striking_accuracy)
        .bind(fighter.takedown_accuracy)
        .bind(fighter.takedown_defense)
        .bind(fighter.wins_by_ko)
        .bind(fighter.wins_by_sub)
        .bind(fighter.wins_by_dec)
        .execute(&self.pool)
        .await
        .context("Failed to insert fighter")?;

        let id = result.last_insert_rowid();
        self.get_fighter(id)
            .await?
            .with_context(|| format!("Fighter {} missing after insert", id))
    }

    /// Whole roster, ordered by id
    pub async fn get_fighters(&self) -> Result<Vec<Fighter>> {
        sqlx::query_as::<_, Fighter>("SELECT * FROM fighters ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch fighters")
    }

    pub async fn get_fighter(&self, id: i64) -> Result<Option<Fighter>> {
        sqlx::query_as::<_, Fighter>("SELECT * FROM fighters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch fighter")
    }

    /// Get count of fighters
    pub async fn fighter_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fighters")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count fighters")?;

        Ok(row.0)
    }
}
