use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{self, get_all_questions, get_question, search_questions},
        },
        NewQuestion, Question,
    },
    pagination::{paginate, QUESTIONS_PER_PAGE},
    server::app::AppState,
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::categories::categories_by_id;
use super::{ApiError, ApiResponse, AppJson, AppPath, AppQuery, Envelope, PageQuery, QuestionsList};

// every field is optional so a missing one ends up as 422 rather than a
// deserialization failure
#[derive(Deserialize)]
struct QuestionBody {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl TryFrom<QuestionBody> for NewQuestion {
    type Error = ApiError;

    fn try_from(body: QuestionBody) -> Result<Self, Self::Error> {
        match (body.question, body.answer, body.category, body.difficulty) {
            (Some(question), Some(answer), Some(category), Some(difficulty)) => Ok(NewQuestion {
                question,
                answer,
                category,
                difficulty,
            }),
            _ => Err(ApiError::Unprocessable(
                "question, answer, category and difficulty are required".to_owned(),
            )),
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default, rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
    #[serde(flatten)]
    list: QuestionsList,
}

#[derive(Serialize)]
struct Created {
    created: i64,
    #[serde(flatten)]
    list: QuestionsList,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = get_all_questions(&pool).await?;
    let current = paginate(page, QUESTIONS_PER_PAGE, &questions);
    // a page past the end is reported like an empty table
    if current.is_empty() {
        tracing::debug!(page, total = questions.len(), "Empty questions page");
        return Err(ApiError::NotFound);
    }
    let categories = get_all_categories(&pool).await?;
    Ok(Envelope::new(QuestionsPage {
        questions: current.to_vec(),
        total_questions: questions.len(),
        categories: categories_by_id(categories),
        current_category: None,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResponse<Deleted> {
    get_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;
    questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Question deleted");

    let remaining = get_all_questions(&pool)
        .await
        .map_err(ApiError::unprocessable)?;
    Ok(Envelope::new(Deleted {
        deleted: id,
        list: QuestionsList::page(&remaining, page),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
    AppJson(body): AppJson<QuestionBody>,
) -> ApiResponse<Created> {
    let new_question = NewQuestion::try_from(body)?;
    let id = questions::create_question(&pool, &new_question)
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id, category = new_question.category, "Question created");

    let all = get_all_questions(&pool)
        .await
        .map_err(ApiError::unprocessable)?;
    Ok(Envelope::new(Created {
        created: id,
        list: QuestionsList::page(&all, page),
    }))
}

async fn search(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
    AppJson(body): AppJson<SearchBody>,
) -> ApiResponse<QuestionsList> {
    let found = search_questions(&pool, &body.search_term).await?;
    tracing::debug!(term = %body.search_term, found = found.len(), "Searched questions");
    Ok(Envelope::new(QuestionsList::page(&found, page)))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> QuestionBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let question = NewQuestion::try_from(body(
            r#"{"question": "Test?", "answer": "Test", "category": "2", "difficulty": 1}"#,
        ))
        .unwrap();
        assert_eq!(question.category, 2);
        assert_eq!(question.difficulty, 1);
    }

    #[test]
    fn every_field_is_required() {
        for missing in ["question", "answer", "category", "difficulty"] {
            let mut value = serde_json::json!({
                "question": "Test?",
                "answer": "Test",
                "category": 2,
                "difficulty": 1
            });
            value.as_object_mut().unwrap().remove(missing);
            let body: QuestionBody = serde_json::from_value(value).unwrap();
            assert!(
                matches!(NewQuestion::try_from(body), Err(ApiError::Unprocessable(_))),
                "{missing} should be required"
            );
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let result = NewQuestion::try_from(body(
            r#"{"question": null, "answer": "Test", "category": 2, "difficulty": 1}"#,
        ));
        assert!(matches!(result, Err(ApiError::Unprocessable(_))));
    }

    #[test]
    fn search_term_defaults_to_empty() {
        let body: SearchBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.search_term, "");
    }
}
