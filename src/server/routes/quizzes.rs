use std::collections::HashSet;
use std::sync::PoisonError;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_all_questions, get_questions_for_category},
        Question,
    },
    quiz::{select_question, QuizCategory, SharedRng},
    server::app::AppState,
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiError, ApiResponse, Envelope};

#[derive(Deserialize)]
struct QuizBody {
    #[serde(default)]
    previous_questions: Vec<i64>,
    quiz_category: Option<QuizCategoryBody>,
}

// the client also sends the category `type`, only `id` matters
#[derive(Deserialize)]
struct QuizCategoryBody {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

impl QuizBody {
    fn category(&self) -> Result<QuizCategory, ApiError> {
        self.quiz_category
            .as_ref()
            .and_then(|c| c.id)
            .map(QuizCategory::from)
            .ok_or_else(|| ApiError::Unprocessable("quiz_category.id is required".to_owned()))
    }
}

#[derive(Serialize)]
struct NextQuestion {
    question: Option<Question>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    State(rng): State<SharedRng>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> ApiResponse<NextQuestion> {
    // any malformed quiz request is a 422, even unparsable JSON
    let Json(body) = body.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let category = body.category()?;

    let candidates = match category {
        QuizCategory::Any => get_all_questions(&pool).await,
        QuizCategory::Only(id) => get_questions_for_category(&pool, id).await,
    }
    .map_err(ApiError::unprocessable)?;

    let previous: HashSet<i64> = body.previous_questions.into_iter().collect();
    let question = {
        let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
        select_question(candidates, &previous, &mut *rng)
    };

    match &question {
        Some(q) => {
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.label().as_str()])
                .inc();
            tracing::debug!(id = q.id, category = %category.label(), "Quiz question selected");
        }
        None => tracing::debug!(category = %category.label(), "Quiz exhausted"),
    }
    Ok(Envelope::new(NextQuestion { question }))
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(play_quiz))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_of(json: &str) -> Result<QuizCategory, ApiError> {
        serde_json::from_str::<QuizBody>(json).unwrap().category()
    }

    #[test]
    fn category_id_as_number_or_string() {
        assert_eq!(
            category_of(r#"{"quiz_category": {"type": "Science", "id": "1"}}"#).unwrap(),
            QuizCategory::Only(1)
        );
        assert_eq!(
            category_of(r#"{"quiz_category": {"id": 0}, "previous_questions": [1]}"#).unwrap(),
            QuizCategory::Any
        );
    }

    #[test]
    fn missing_category_is_unprocessable() {
        assert!(matches!(category_of("{}"), Err(ApiError::Unprocessable(_))));
        assert!(matches!(
            category_of(r#"{"quiz_category": {"type": "Science"}}"#),
            Err(ApiError::Unprocessable(_))
        ));
    }

    #[test]
    fn non_numeric_id_does_not_parse() {
        assert!(serde_json::from_str::<QuizBody>(r#"{"quiz_category": {"id": "abc"}}"#).is_err());
    }
}
