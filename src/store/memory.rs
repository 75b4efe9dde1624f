// src/store/memory.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        event::{CreateEventRequest, Event},
        question::{Answer, CreateQuestionRequest, Question, QuestionWithAnswers},
        quiz::{CreateQuizRequest, Quiz, QuizSummary},
        submission::{GradedAnswer, Submission, UserAnswer, UserAnswerDetail},
    },
    store::QuizStore,
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    quizzes: Vec<Quiz>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    submissions: Vec<Submission>,
    user_answers: Vec<UserAnswer>,
    events: Vec<Event>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// `QuizStore` kept in process memory.
///
/// Used when no database is configured and by the test suite. Rows are kept
/// in insertion order, which is also id order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn list_quizzes(&self, limit: Option<i64>) -> Result<Vec<QuizSummary>, AppError> {
        let tables = self.tables.read().await;

        let mut quizzes: Vec<&Quiz> = tables.quizzes.iter().collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(quizzes
            .into_iter()
            .take(limit)
            .map(|quiz| {
                let count = tables
                    .questions
                    .iter()
                    .filter(|q| q.quiz_id == quiz.id)
                    .count() as i64;
                QuizSummary::new(quiz.clone(), count)
            })
            .collect())
    }

    async fn get_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn count_questions(&self, quiz_id: i64) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().filter(|q| q.quiz_id == quiz_id).count() as i64)
    }

    async fn questions_with_answers(
        &self,
        quiz_id: i64,
    ) -> Result<Vec<QuestionWithAnswers>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .map(|question| QuestionWithAnswers {
                question: question.clone(),
                answers: tables
                    .answers
                    .iter()
                    .filter(|a| a.question_id == question.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn create_quiz(&self, req: &CreateQuizRequest) -> Result<Quiz, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let quiz = Quiz {
            id: tables.next_id(),
            title: req.title.clone(),
            description: req.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.quizzes.push(quiz.clone());
        Ok(quiz)
    }

    async fn create_question(
        &self,
        quiz_id: i64,
        req: &CreateQuestionRequest,
    ) -> Result<QuestionWithAnswers, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if !tables.quizzes.iter().any(|q| q.id == quiz_id) {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        let question = Question {
            id: tables.next_id(),
            quiz_id,
            text: req.text.clone(),
            question_type: req.question_type.as_str().to_string(),
            created_at: now,
        };
        tables.questions.push(question.clone());

        let mut answers = Vec::with_capacity(req.answers.len());
        for answer in &req.answers {
            let created = Answer {
                id: tables.next_id(),
                question_id: question.id,
                text: answer.text.clone(),
                is_correct: answer.is_correct,
            };
            tables.answers.push(created.clone());
            answers.push(created);
        }

        Ok(QuestionWithAnswers { question, answers })
    }

    async fn upcoming_events(
        &self,
        now: DateTime<Utc>,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, AppError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|e| e.is_upcoming(now))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            events.truncate(limit.max(0) as usize);
        }
        Ok(events)
    }

    async fn past_events(&self, now: DateTime<Utc>) -> Result<Vec<Event>, AppError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|e| !e.is_upcoming(now))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn create_event(&self, req: &CreateEventRequest) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        let event = Event {
            id: tables.next_id(),
            title: req.title.clone(),
            description: req.description.clone(),
            date: req.date,
            location: req.location.clone(),
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn create_submission(
        &self,
        quiz_id: i64,
        user_name: &str,
    ) -> Result<Submission, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.quizzes.iter().any(|q| q.id == quiz_id) {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }
        let submission = Submission {
            id: tables.next_id(),
            quiz_id,
            user_name: user_name.to_string(),
            score: 0,
            submitted_at: Utc::now(),
        };
        tables.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn finalize_submission(
        &self,
        submission_id: i64,
        score: i32,
        records: &[GradedAnswer],
    ) -> Result<Vec<UserAnswer>, AppError> {
        // Single write guard: score and answers land together or not at all.
        let mut tables = self.tables.write().await;

        let position = tables
            .submissions
            .iter()
            .position(|s| s.id == submission_id)
            .ok_or(AppError::NotFound("Submission not found".to_string()))?;

        if let Some(missing) = records.iter().find(|r| {
            !tables
                .answers
                .iter()
                .any(|a| a.id == r.answer_id && a.question_id == r.question_id)
        }) {
            return Err(AppError::InternalServerError(format!(
                "answer {} of question {} does not exist",
                missing.answer_id, missing.question_id
            )));
        }

        tables.submissions[position].score = score;

        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            let user_answer = UserAnswer {
                id: tables.next_id(),
                submission_id,
                question_id: record.question_id,
                answer_id: record.answer_id,
                is_correct: record.is_correct,
            };
            tables.user_answers.push(user_answer.clone());
            saved.push(user_answer);
        }

        Ok(saved)
    }

    async fn delete_submission(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.submissions.retain(|s| s.id != id);
        tables.user_answers.retain(|ua| ua.submission_id != id);
        Ok(())
    }

    async fn get_submission(&self, id: i64) -> Result<Option<Submission>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn submission_answers(
        &self,
        submission_id: i64,
    ) -> Result<Vec<UserAnswerDetail>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_answers
            .iter()
            .filter(|ua| ua.submission_id == submission_id)
            .filter_map(|ua| {
                let question = tables.questions.iter().find(|q| q.id == ua.question_id)?;
                let answer = tables.answers.iter().find(|a| a.id == ua.answer_id)?;
                Some(UserAnswerDetail {
                    id: ua.id,
                    question_id: ua.question_id,
                    question_text: question.text.clone(),
                    question_type: question.question_type.clone(),
                    answer_id: ua.answer_id,
                    answer_text: answer.text.clone(),
                    is_correct: ua.is_correct,
                })
            })
            .collect())
    }

    async fn correct_answers(&self, question_ids: &[i64]) -> Result<Vec<Answer>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| a.is_correct && question_ids.contains(&a.question_id))
            .cloned()
            .collect())
    }
}
