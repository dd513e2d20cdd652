//! A Postgres-backed [`quizbyte_core::Store`].
//!
//! Uses `sqlx` with the `runtime-tokio` + `postgres` feature set, the same
//! crate and pooling shape `comfortablynumb-pmp-llm-gateway-api`'s own
//! `PostgresStorage` uses for its persistence layer (`reflex` itself has no
//! SQL store). Queries are plain runtime `sqlx::query`/`query_as` calls
//! rather than the `query!` compile-time macro family, since this crate is
//! built without a live database available to check against at compile
//! time.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Row, Transaction};
use uuid::Uuid;

use quizbyte_core::{Quiz, QuizEvaluationBands, ScoreBand, Store, StoreError, SubCategory};

/// A connection pool implementing [`Store`] against the schema created by
/// `migrations/0001_init.sql`.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn load_bands(&self, quiz_id: Uuid) -> Result<Vec<ScoreBand>, StoreError> {
        let rows = sqlx::query(
            "SELECT lo, hi, explanation FROM quiz_evaluation_bands \
             WHERE quiz_id = $1 ORDER BY band_order ASC",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                ScoreBand::new(
                    row.get::<f64, _>("lo"),
                    row.get::<f64, _>("hi"),
                    row.get::<String, _>("explanation"),
                )
            })
            .collect())
    }

    fn row_to_quiz(row: &sqlx::postgres::PgRow) -> Quiz {
        Quiz {
            id: row.get("id"),
            question: row.get("question"),
            model_answers: row.get("model_answers"),
            keywords: row.get("keywords"),
            difficulty: row.get::<i16, _>("difficulty") as u8,
            sub_category_id: row.get("sub_category_id"),
        }
    }

    async fn insert_quiz_tx(
        tx: &mut Transaction<'_, sqlx::Postgres>,
        quiz: &Quiz,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO quizzes (id, question, model_answers, keywords, difficulty, sub_category_id) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(quiz.id)
        .bind(&quiz.question)
        .bind(&quiz.model_answers)
        .bind(&quiz.keywords)
        .bind(quiz.difficulty as i16)
        .bind(quiz.sub_category_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn get_quiz_by_id(&self, id: Uuid) -> Result<Quiz, StoreError> {
        let row = sqlx::query(
            "SELECT id, question, model_answers, keywords, difficulty, sub_category_id \
             FROM quizzes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        Ok(Self::row_to_quiz(&row))
    }

    async fn get_random_quiz(&self, sub_category_id: Option<Uuid>) -> Result<Quiz, StoreError> {
        let row = match sub_category_id {
            Some(sub_category_id) => sqlx::query(
                "SELECT id, question, model_answers, keywords, difficulty, sub_category_id \
                 FROM quizzes WHERE sub_category_id = $1 ORDER BY random() LIMIT 1",
            )
            .bind(sub_category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?,
            None => sqlx::query(
                "SELECT id, question, model_answers, keywords, difficulty, sub_category_id \
                 FROM quizzes ORDER BY random() LIMIT 1",
            )
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?,
        };

        let row = row.ok_or_else(|| StoreError::NotFound("no quizzes available".to_string()))?;
        Ok(Self::row_to_quiz(&row))
    }

    async fn get_quizzes_by_criteria(
        &self,
        sub_category_id: Uuid,
        count: u32,
    ) -> Result<Vec<Quiz>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, question, model_answers, keywords, difficulty, sub_category_id \
             FROM quizzes WHERE sub_category_id = $1 ORDER BY id LIMIT $2",
        )
        .bind(sub_category_id)
        .bind(count as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_quiz).collect())
    }

    async fn get_sub_category_id_by_name(&self, name: &str) -> Result<Uuid, StoreError> {
        let row = sqlx::query("SELECT id FROM sub_categories WHERE lower(name) = lower($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(row.get("id"))
    }

    async fn get_all_sub_categories(&self) -> Result<Vec<SubCategory>, StoreError> {
        let rows = sqlx::query("SELECT id, name, category_name FROM sub_categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| SubCategory {
                id: row.get("id"),
                name: row.get("name"),
                category_name: row.get("category_name"),
            })
            .collect())
    }

    async fn get_quiz_evaluation_bands(
        &self,
        quiz_id: Uuid,
    ) -> Result<Option<QuizEvaluationBands>, StoreError> {
        let bands = self.load_bands(quiz_id).await?;
        if bands.is_empty() {
            Ok(None)
        } else {
            Ok(Some(QuizEvaluationBands { quiz_id, bands }))
        }
    }

    async fn save_quiz(&self, quiz: &Quiz) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Self::insert_quiz_tx(&mut tx, quiz).await?;
        tx.commit()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn save_quizzes(&self, quizzes: &[Quiz]) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        for quiz in quizzes {
            if let Err(err) = Self::insert_quiz_tx(&mut tx, quiz).await {
                // Any single failure rolls back the whole sub-category
                // batch; dropping `tx` here without `commit`
                // performs the rollback.
                return Err(err);
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}
