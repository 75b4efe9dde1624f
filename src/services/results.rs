// src/services/results.rs

use serde::Serialize;

use crate::models::{
    question::Answer,
    quiz::Quiz,
    submission::{Submission, UserAnswerDetail},
};

/// The question part of a result group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultQuestion {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: String,
}

/// Everything the user chose for one question, next to the currently correct options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub question: ResultQuestion,
    pub user_answers: Vec<UserAnswerDetail>,
    pub correct_answers: Vec<Answer>,
}

/// Read-side view of a finished submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub submission: Submission,
    pub quiz: Quiz,
    pub total_questions: i64,
    pub percentage: f64,
    pub questions_with_answers: Vec<QuestionResult>,
}

/// Score as a percentage of the quiz's question count; 0 for an empty quiz.
pub fn percentage(score: i32, total_questions: i64) -> f64 {
    if total_questions > 0 {
        (score as f64 / total_questions as f64) * 100.0
    } else {
        0.0
    }
}

/// Groups a submission's answers by question, in order of first appearance.
///
/// `correct_answers` holds the current correct options of every referenced
/// question; each group receives the ones belonging to its question.
pub fn aggregate(
    submission: Submission,
    quiz: Quiz,
    total_questions: i64,
    user_answers: Vec<UserAnswerDetail>,
    correct_answers: &[Answer],
) -> ResultView {
    let mut groups: Vec<QuestionResult> = Vec::new();

    for user_answer in user_answers {
        match groups
            .iter()
            .position(|g| g.question.id == user_answer.question_id)
        {
            Some(index) => groups[index].user_answers.push(user_answer),
            None => {
                let question_id = user_answer.question_id;
                groups.push(QuestionResult {
                    question: ResultQuestion {
                        id: question_id,
                        text: user_answer.question_text.clone(),
                        question_type: user_answer.question_type.clone(),
                    },
                    user_answers: vec![user_answer],
                    correct_answers: correct_answers
                        .iter()
                        .filter(|a| a.question_id == question_id && a.is_correct)
                        .cloned()
                        .collect(),
                });
            }
        }
    }

    ResultView {
        percentage: percentage(submission.score, total_questions),
        submission,
        quiz,
        total_questions,
        questions_with_answers: groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn quiz() -> Quiz {
        let now = Utc::now();
        Quiz {
            id: 1,
            title: "History".to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(score: i32) -> Submission {
        Submission {
            id: 7,
            quiz_id: 1,
            user_name: "alice".to_string(),
            score,
            submitted_at: Utc::now(),
        }
    }

    fn detail(id: i64, question_id: i64, answer_id: i64, is_correct: bool) -> UserAnswerDetail {
        UserAnswerDetail {
            id,
            question_id,
            question_text: format!("Question {}", question_id),
            question_type: "multiple".to_string(),
            answer_id,
            answer_text: format!("Answer {}", answer_id),
            is_correct,
        }
    }

    fn correct(id: i64, question_id: i64) -> Answer {
        Answer {
            id,
            question_id,
            text: format!("Answer {}", id),
            is_correct: true,
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 2), 50.0);
        assert_eq!(percentage(2, 2), 100.0);
    }

    #[test]
    fn test_groups_by_first_appearance() {
        let answers = vec![
            detail(1, 1, 11, true),
            detail(2, 2, 23, false),
            detail(3, 2, 21, true),
        ];
        let correct_answers = vec![correct(11, 1), correct(21, 2), correct(22, 2)];

        let view = aggregate(submission(2), quiz(), 2, answers, &correct_answers);

        assert_eq!(view.percentage, 100.0);
        assert_eq!(view.questions_with_answers.len(), 2);

        let q1 = &view.questions_with_answers[0];
        assert_eq!(q1.question.id, 1);
        assert_eq!(q1.user_answers.len(), 1);
        assert_eq!(q1.correct_answers, vec![correct(11, 1)]);

        let q2 = &view.questions_with_answers[1];
        assert_eq!(q2.question.id, 2);
        let chosen: Vec<i64> = q2.user_answers.iter().map(|a| a.answer_id).collect();
        assert_eq!(chosen, vec![23, 21]);
        assert_eq!(q2.correct_answers, vec![correct(21, 2), correct(22, 2)]);
    }

    #[test]
    fn test_empty_submission() {
        let view = aggregate(submission(0), quiz(), 0, Vec::new(), &[]);
        assert_eq!(view.percentage, 0.0);
        assert!(view.questions_with_answers.is_empty());
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let answers = vec![detail(1, 1, 12, false)];
        let correct_answers = vec![correct(11, 1)];
        let first = aggregate(submission(0), quiz(), 1, answers.clone(), &correct_answers);
        let second = aggregate(submission(0), quiz(), 1, answers, &correct_answers);
        assert_eq!(first.questions_with_answers, second.questions_with_answers);
        assert_eq!(first.percentage, second.percentage);
    }
}
