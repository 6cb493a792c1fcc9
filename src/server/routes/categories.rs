use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Category,
    },
    server::app::AppState,
};

use super::{ApiError, ApiResponse, AppPath, AppQuery, Envelope, PageQuery, QuestionsList};

#[derive(Serialize)]
struct CategoriesList {
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

/// `{id: type}` as the frontend expects it.
pub(super) fn categories_by_id(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

async fn list_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesList> {
    let categories = get_all_categories(&pool).await?;
    // an empty categories table is an error for the frontend, not an empty list
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_categories = categories.len();
    Ok(Envelope::new(CategoriesList {
        categories: categories_by_id(categories),
        total_categories,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    AppPath(category_id): AppPath<i64>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResponse<QuestionsList> {
    let questions = get_questions_for_category(&pool, category_id).await?;
    if questions.is_empty() {
        tracing::debug!(category_id, "No questions in category");
        return Err(ApiError::NotFound);
    }
    Ok(Envelope::new(QuestionsList::page(&questions, page)))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
}
