use std::sync::Arc;

use chrono::{TimeZone, Utc};

use pylearn_backend::database::pool::create_pool;
use pylearn_backend::models::answer::AnswerValue;
use pylearn_backend::models::quiz_result::{QuestionOutcome, QuizResult};
use pylearn_backend::services::result_store::{
    result_key, ResultRepository, ResultStore, SqliteResultStore,
};

fn result(score: u32) -> QuizResult {
    QuizResult {
        quiz_id: "python-basics-1".into(),
        score,
        total_points: 16,
        elapsed_seconds: 312,
        answers: vec![QuestionOutcome {
            question_id: "q1".into(),
            given_answer: Some(AnswerValue::Choice(1)),
            is_correct: true,
            points: 2,
        }],
        completed_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn sqlite_store_keeps_latest_result_per_quiz() {
    let pool = create_pool("sqlite::memory:", 1).await.expect("pool");
    let store = Arc::new(SqliteResultStore::new(pool));
    let repo = ResultRepository::new(store.clone());

    assert!(repo.load("python-basics-1").await.unwrap().is_none());

    repo.save(&result(9)).await.unwrap();
    repo.save(&result(14)).await.unwrap();

    let stored = repo.load("python-basics-1").await.unwrap().unwrap();
    assert_eq!(stored, result(14));

    let raw = store
        .get(&result_key("python-basics-1"))
        .await
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["quizId"], "python-basics-1");
    assert_eq!(json["timeTaken"], 312);
    assert_eq!(json["answers"][0]["userAnswer"], 1);
}
