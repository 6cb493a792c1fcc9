use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{DbError, DbResult};

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> DbResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> DbResult<Question> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound {
        resource: "question",
        id,
    })
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> DbResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// Questions whose text contains `term`, ignoring case for any letter.
/// The answer text is not searched.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> DbResult<Vec<Question>> {
    // SQLite LIKE only folds ASCII, so matching happens here
    let term = term.to_lowercase();
    let questions = get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect();
    Ok(questions)
}

pub async fn create_question(pool: &SqlitePool, new_question: &NewQuestion) -> DbResult<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&new_question.question)
    .bind(&new_question.answer)
    .bind(new_question.category)
    .bind(new_question.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> DbResult<()> {
    let mut conn = pool.acquire().await?;

    let deleted = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(DbError::NotFound {
            resource: "question",
            id,
        });
    }
    Ok(())
}

/// Inserts or overwrites questions by id, all or nothing.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> DbResult<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
