// tests/pg_store_tests.rs
//
// Runs against a live Postgres: `DATABASE_URL=... cargo test -- --ignored`.

use std::sync::Arc;

use quiz_events::{
    error::AppError,
    models::{
        question::{CreateAnswerRequest, CreateQuestionRequest, QuestionType},
        quiz::CreateQuizRequest,
        submission::GradedAnswer,
    },
    routes,
    state::AppState,
    store::{PgStore, QuizStore},
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;

async fn connect() -> PgStore {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    PgStore::new(pool)
}

async fn spawn_app() -> String {
    let state = AppState::new(Arc::new(connect().await));
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

fn answer(text: &str, is_correct: bool) -> CreateAnswerRequest {
    CreateAnswerRequest {
        text: text.to_string(),
        is_correct,
    }
}

/// Quiz with Q1 (single: A1 correct, A2 wrong) and Q2 (multiple: B1, B2 correct, B3 wrong).
struct Seeded {
    quiz_id: i64,
    q1: i64,
    a1: i64,
    a2: i64,
    q2: i64,
    b1: i64,
    b2: i64,
    b3: i64,
}

async fn seed(store: &PgStore) -> Seeded {
    let quiz = store
        .create_quiz(&CreateQuizRequest {
            title: unique("quiz"),
            description: "Ownership".to_string(),
        })
        .await
        .unwrap();

    let q1 = store
        .create_question(
            quiz.id,
            &CreateQuestionRequest {
                text: "Which keyword declares an immutable binding?".to_string(),
                question_type: QuestionType::Single,
                answers: vec![answer("let", true), answer("var", false)],
            },
        )
        .await
        .unwrap();

    let q2 = store
        .create_question(
            quiz.id,
            &CreateQuestionRequest {
                text: "Which types are Copy?".to_string(),
                question_type: QuestionType::Multiple,
                answers: vec![
                    answer("u32", true),
                    answer("bool", true),
                    answer("String", false),
                ],
            },
        )
        .await
        .unwrap();

    Seeded {
        quiz_id: quiz.id,
        q1: q1.question.id,
        a1: q1.answers[0].id,
        a2: q1.answers[1].id,
        q2: q2.question.id,
        b1: q2.answers[0].id,
        b2: q2.answers[1].id,
        b3: q2.answers[2].id,
    }
}

fn graded(question_id: i64, answer_id: i64, is_correct: bool) -> GradedAnswer {
    GradedAnswer {
        question_id,
        answer_id,
        is_correct,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_questions_with_answers_in_quiz_order() {
    let store = connect().await;
    let seeded = seed(&store).await;

    let questions = store.questions_with_answers(seeded.quiz_id).await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].question.id, seeded.q1);
    assert_eq!(questions[0].question.question_type, "single");
    assert_eq!(questions[1].question.question_type, "multiple");
    let ids: Vec<i64> = questions[1].answers.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![seeded.b1, seeded.b2, seeded.b3]);
    assert_eq!(store.count_questions(seeded.quiz_id).await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_quiz_listing_with_and_without_limit() {
    let store = connect().await;
    let seeded = seed(&store).await;

    let all = store.list_quizzes(None).await.unwrap();
    let ours = all
        .iter()
        .find(|q| q.id == seeded.quiz_id)
        .expect("seeded quiz missing from listing");
    assert_eq!(ours.question_count, 2);

    let limited = store.list_quizzes(Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_finalize_updates_score_and_keeps_record_order() {
    let store = connect().await;
    let seeded = seed(&store).await;
    let submission = store
        .create_submission(seeded.quiz_id, &unique("user"))
        .await
        .unwrap();
    assert_eq!(submission.score, 0);

    let records = [
        graded(seeded.q1, seeded.a1, true),
        graded(seeded.q2, seeded.b3, false),
        graded(seeded.q2, seeded.b1, true),
    ];
    let saved = store
        .finalize_submission(submission.id, 2, &records)
        .await
        .unwrap();

    let saved_answers: Vec<i64> = saved.iter().map(|r| r.answer_id).collect();
    assert_eq!(saved_answers, vec![seeded.a1, seeded.b3, seeded.b1]);
    assert!(saved.windows(2).all(|w| w[0].id < w[1].id));
    assert!(saved.iter().all(|r| r.submission_id == submission.id));

    let stored = store.get_submission(submission.id).await.unwrap().unwrap();
    assert_eq!(stored.score, 2);

    let details = store.submission_answers(submission.id).await.unwrap();
    assert_eq!(details.len(), 3);
    assert_eq!(details[0].answer_text, "let");
    assert_eq!(details[1].answer_id, seeded.b3);
    assert_eq!(details[1].answer_text, "String");
    assert!(!details[1].is_correct);
    assert_eq!(details[2].question_text, "Which types are Copy?");
    assert_eq!(details[2].question_type, "multiple");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_finalize_rolls_back_on_bad_answer() {
    let store = connect().await;
    let seeded = seed(&store).await;
    let submission = store
        .create_submission(seeded.quiz_id, &unique("user"))
        .await
        .unwrap();

    // The second insert violates the answers foreign key.
    let records = [
        graded(seeded.q1, seeded.a1, true),
        graded(seeded.q1, i64::MAX, false),
    ];
    let err = store
        .finalize_submission(submission.id, 1, &records)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InternalServerError(_)));

    let stored = store.get_submission(submission.id).await.unwrap().unwrap();
    assert_eq!(stored.score, 0);
    assert!(store.submission_answers(submission.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_correct_answers_for_several_questions() {
    let store = connect().await;
    let seeded = seed(&store).await;

    let correct = store
        .correct_answers(&[seeded.q1, seeded.q2])
        .await
        .unwrap();
    let ids: Vec<i64> = correct.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![seeded.a1, seeded.b1, seeded.b2]);
    assert!(!ids.contains(&seeded.a2));

    assert!(store.correct_answers(&[]).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_submission_cascades() {
    let store = connect().await;
    let seeded = seed(&store).await;
    let submission = store
        .create_submission(seeded.quiz_id, &unique("user"))
        .await
        .unwrap();
    store
        .finalize_submission(submission.id, 1, &[graded(seeded.q1, seeded.a1, true)])
        .await
        .unwrap();

    store.delete_submission(submission.id).await.unwrap();

    assert!(store.get_submission(submission.id).await.unwrap().is_none());
    assert!(store.submission_answers(submission.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_question_for_missing_quiz_is_not_found() {
    let store = connect().await;

    let err = store
        .create_question(
            i64::MAX,
            &CreateQuestionRequest {
                text: "Orphan?".to_string(),
                question_type: QuestionType::Single,
                answers: vec![answer("yes", true)],
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_attempt_flow_over_http() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let seeded = seed(&connect().await).await;

    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("user_name", &unique("user"))
        .append_pair(&format!("question_{}", seeded.q1), &seeded.a2.to_string())
        .append_pair(&format!("question_{}", seeded.q2), &seeded.b2.to_string())
        .finish();

    let response = client
        .post(format!("{}/api/quizzes/{}/attempt", address, seeded.quiz_id))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .expect("Failed to submit attempt");
    assert_eq!(response.status().as_u16(), 201);
    let submitted: Value = response.json().await.unwrap();
    assert_eq!(submitted["score"], 1);

    let result: Value = client
        .get(format!(
            "{}{}",
            address,
            submitted["result_url"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(result["percentage"], 50.0);
    let groups = result["questions_with_answers"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["user_answers"][0]["is_correct"], false);
    assert_eq!(groups[0]["correct_answers"][0]["id"], seeded.a1);
}
