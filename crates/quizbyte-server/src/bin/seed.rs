//! Loads a JSON fixture of sub-categories and quizzes into Postgres for
//! local development. Not part of the Evaluation Core's runtime path.

use std::env;
use std::fs;

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct SeedFixture {
    categories: Vec<String>,
    sub_categories: Vec<SeedSubCategory>,
    quizzes: Vec<SeedQuiz>,
}

#[derive(Debug, Deserialize)]
struct SeedSubCategory {
    name: String,
    category_name: String,
}

#[derive(Debug, Deserialize)]
struct SeedQuiz {
    question: String,
    model_answers: Vec<String>,
    keywords: Vec<String>,
    difficulty: i16,
    sub_category_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let fixture_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "fixtures/seed.json".to_string());
    let database_url = env::var("DATABASE_URL")?;

    let raw = fs::read_to_string(&fixture_path)?;
    let fixture: SeedFixture = serde_json::from_str(&raw)?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    for category in &fixture.categories {
        sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(category)
            .execute(&pool)
            .await?;
    }

    for sub_category in &fixture.sub_categories {
        sqlx::query(
            "INSERT INTO sub_categories (name, category_name) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(&sub_category.name)
        .bind(&sub_category.category_name)
        .execute(&pool)
        .await?;
    }

    for quiz in &fixture.quizzes {
        let sub_category_id: Uuid =
            sqlx::query("SELECT id FROM sub_categories WHERE name = $1")
                .bind(&quiz.sub_category_name)
                .fetch_one(&pool)
                .await
                .map(|row| sqlx::Row::get(&row, "id"))?;

        sqlx::query(
            "INSERT INTO quizzes (question, model_answers, keywords, difficulty, sub_category_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&quiz.question)
        .bind(&quiz.model_answers)
        .bind(&quiz.keywords)
        .bind(quiz.difficulty)
        .bind(sub_category_id)
        .execute(&pool)
        .await?;
    }

    tracing::info!(
        categories = fixture.categories.len(),
        sub_categories = fixture.sub_categories.len(),
        quizzes = fixture.quizzes.len(),
        "seed complete"
    );

    Ok(())
}
