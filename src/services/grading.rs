// src/services/grading.rs

use std::collections::HashMap;

use crate::models::{
    question::{Answer, QuestionWithAnswers},
    submission::GradedAnswer,
};

/// Raw answer selections of one attempt, keyed by question id.
///
/// Values are the answer identifiers exactly as submitted, in submission
/// order. They are resolved (and possibly discarded) during grading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections(HashMap<i64, Vec<String>>);

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one selected answer identifier for a question.
    pub fn push(&mut self, question_id: i64, answer_id: impl Into<String>) {
        self.0.entry(question_id).or_default().push(answer_id.into());
    }

    /// Selected identifiers for a question; empty when it was skipped.
    pub fn get(&self, question_id: i64) -> &[String] {
        self.0.get(&question_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for Selections {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        let mut selections = Selections::new();
        for (question_id, answer_id) in iter {
            selections.push(question_id, answer_id);
        }
        selections
    }
}

/// Outcome of grading one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grade {
    /// Number of questions that earned their point.
    pub score: i32,
    /// Every resolved selection, correct or not, in grading order.
    pub records: Vec<GradedAnswer>,
}

/// Grades an attempt against the quiz's questions (in quiz order).
///
/// * Skipped questions produce no record and no score.
/// * Identifiers that do not name one of the question's own answers are ignored.
/// * A question earns at most one point: the first correct selection is
///   credited and ends processing of that question.
pub fn grade(questions: &[QuestionWithAnswers], selections: &Selections) -> Grade {
    let mut result = Grade::default();

    for qa in questions {
        let question_id = qa.question.id;
        let selected = selections.get(question_id);

        if selected.is_empty() {
            continue;
        }

        for raw_id in selected {
            let Some(answer) = resolve(qa, raw_id) else {
                tracing::debug!(question_id, answer_id = %raw_id, "Ignoring unresolved answer selection");
                continue;
            };

            result.records.push(GradedAnswer {
                question_id,
                answer_id: answer.id,
                is_correct: answer.is_correct,
            });

            if answer.is_correct {
                result.score += 1;
                break;
            }
        }
    }

    result
}

/// Resolves a submitted identifier against the answers of one question only.
fn resolve<'a>(qa: &'a QuestionWithAnswers, raw_id: &str) -> Option<&'a Answer> {
    let answer_id = raw_id.trim().parse::<i64>().ok()?;
    qa.answer(answer_id)
}
