// src/services/submission.rs

use crate::{
    error::AppError,
    models::submission::{Submission, UserAnswer},
    services::{
        grading::{self, Grade, Selections},
        results::{self, ResultView},
    },
    store::QuizStore,
};

/// Message shown when the attempt form arrives without a usable name.
pub const BLANK_NAME_MESSAGE: &str = "Please enter your name.";

/// Longest accepted user name, in characters (`user_submissions.user_name` is VARCHAR(100)).
pub const MAX_USER_NAME_CHARS: usize = 100;

/// Opens a submission for a quiz.
///
/// The quiz must exist and `user_name` must contain something other than
/// whitespace, within `MAX_USER_NAME_CHARS`. Nothing is written when a check fails.
pub async fn start_submission(
    store: &dyn QuizStore,
    quiz_id: i64,
    user_name: &str,
) -> Result<Submission, AppError> {
    if store.get_quiz(quiz_id).await?.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    if user_name.trim().is_empty() {
        return Err(AppError::BadRequest(BLANK_NAME_MESSAGE.to_string()));
    }

    if user_name.chars().count() > MAX_USER_NAME_CHARS {
        return Err(AppError::BadRequest(format!(
            "Name must be at most {} characters.",
            MAX_USER_NAME_CHARS
        )));
    }

    let submission = store.create_submission(quiz_id, user_name).await?;
    tracing::info!(
        submission_id = submission.id,
        quiz_id,
        "Started quiz submission"
    );

    Ok(submission)
}

/// Grades the selections against the submission's quiz and persists the outcome.
///
/// If grading or persisting fails, the submission shell is deleted so a
/// half-written attempt never shows up as a genuine zero score.
pub async fn complete_submission(
    store: &dyn QuizStore,
    submission: &Submission,
    selections: &Selections,
) -> Result<(i32, Vec<UserAnswer>), AppError> {
    let outcome = grade_and_persist(store, submission, selections).await;

    match outcome {
        Ok((score, records)) => {
            tracing::info!(
                submission_id = submission.id,
                score,
                answers = records.len(),
                "Quiz submission graded"
            );
            Ok((score, records))
        }
        Err(e) => {
            tracing::error!(
                submission_id = submission.id,
                "Failed to complete submission, discarding it: {}",
                e
            );
            if let Err(cleanup) = store.delete_submission(submission.id).await {
                tracing::error!(
                    submission_id = submission.id,
                    "Failed to discard submission: {}",
                    cleanup
                );
            }
            Err(e)
        }
    }
}

async fn grade_and_persist(
    store: &dyn QuizStore,
    submission: &Submission,
    selections: &Selections,
) -> Result<(i32, Vec<UserAnswer>), AppError> {
    // Nothing selected: no need to load the quiz.
    let grade = if selections.is_empty() {
        Grade::default()
    } else {
        let questions = store.questions_with_answers(submission.quiz_id).await?;
        grading::grade(&questions, selections)
    };

    let records = store
        .finalize_submission(submission.id, grade.score, &grade.records)
        .await?;

    Ok((grade.score, records))
}

/// Builds the per-question result view of a stored submission.
pub async fn view_result(store: &dyn QuizStore, submission_id: i64) -> Result<ResultView, AppError> {
    let submission = store
        .get_submission(submission_id)
        .await?
        .ok_or(AppError::NotFound("Submission not found".to_string()))?;

    let quiz = store
        .get_quiz(submission.quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let total_questions = store.count_questions(quiz.id).await?;
    let user_answers = store.submission_answers(submission.id).await?;

    let mut question_ids: Vec<i64> = user_answers.iter().map(|a| a.question_id).collect();
    question_ids.sort_unstable();
    question_ids.dedup();
    let correct_answers = store.correct_answers(&question_ids).await?;

    Ok(results::aggregate(
        submission,
        quiz,
        total_questions,
        user_answers,
        &correct_answers,
    ))
}
