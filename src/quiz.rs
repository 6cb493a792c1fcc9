use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::db::Question;

pub type SharedRng = Arc<Mutex<StdRng>>;

/// Entropy-seeded unless `seed` is given.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Arc::new(Mutex::new(rng))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    Any,
    Only(i64),
}

impl From<i64> for QuizCategory {
    // 0 is what the client sends for "All"
    fn from(id: i64) -> Self {
        match id {
            0 => QuizCategory::Any,
            id => QuizCategory::Only(id),
        }
    }
}

impl QuizCategory {
    pub fn label(&self) -> String {
        match self {
            QuizCategory::Any => "all".to_owned(),
            QuizCategory::Only(id) => id.to_string(),
        }
    }
}

/// Picks one question uniformly among `candidates` not in `previous`.
/// `None` means the quiz is exhausted.
pub fn select_question<R: Rng + ?Sized>(
    candidates: Vec<Question>,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> Option<Question> {
    let eligible: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    eligible.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(ids: impl IntoIterator<Item = i64>) -> Vec<Question> {
        ids.into_iter()
            .map(|id| Question {
                id,
                question: format!("question {id}"),
                answer: format!("answer {id}"),
                category: 1,
                difficulty: 1,
            })
            .collect()
    }

    #[test]
    fn zero_means_any_category() {
        assert_eq!(QuizCategory::from(0), QuizCategory::Any);
        assert_eq!(QuizCategory::from(4), QuizCategory::Only(4));
    }

    #[test]
    fn exhausted_quiz_yields_none() {
        let previous: HashSet<i64> = (1..=5).collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_question(questions(1..=5), &previous, &mut rng), None);
        assert_eq!(select_question(vec![], &HashSet::new(), &mut rng), None);
    }

    #[test]
    fn never_repeats_previous_questions() {
        let previous: HashSet<i64> = [1, 2, 3, 5, 8].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let picked = select_question(questions(1..=10), &previous, &mut rng).unwrap();
            assert!(!previous.contains(&picked.id));
        }
    }

    #[test]
    fn last_remaining_question_is_picked() {
        let previous: HashSet<i64> = (1..=9).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let picked = select_question(questions(1..=10), &previous, &mut rng).unwrap();
        assert_eq!(picked.id, 10);
    }

    #[test]
    fn selection_varies() {
        let mut rng = StdRng::seed_from_u64(11);
        let picked: HashSet<i64> = (0..50)
            .filter_map(|_| select_question(questions(1..=10), &HashSet::new(), &mut rng))
            .map(|q| q.id)
            .collect();
        assert!(picked.len() > 1);
    }

    #[test]
    fn same_seed_same_sequence() {
        let pick_ids = |seed| {
            let rng = shared_rng(Some(seed));
            let mut rng = rng.lock().unwrap();
            (0..20)
                .filter_map(|_| select_question(questions(1..=10), &HashSet::new(), &mut *rng))
                .map(|q| q.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(pick_ids(5), pick_ids(5));
    }
}
