use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dto::session_dto::SessionSnapshot;
use crate::error::{Error, Result};
use crate::models::answer::AnswerValue;
use crate::models::quiz_result::QuizResult;
use crate::services::catalog_service::QuizCatalog;
use crate::services::quiz_session::{LoadOutcome, QuizSession};
use crate::services::result_store::ResultRepository;
use crate::services::timer_service::{spawn_countdown, TimerEvent, TimerHandle};

struct ActiveSession {
    session: QuizSession,
    // Dropping the handle stops the countdown.
    _timer: TimerHandle,
}

type SessionMap = Arc<Mutex<HashMap<Uuid, ActiveSession>>>;

#[derive(Debug)]
pub enum StartOutcome {
    Started(SessionSnapshot),
    RedirectToCatalog,
}

/// Drives quiz sessions: owns their timers and persists results on submission.
#[derive(Clone)]
pub struct SessionService {
    catalog: Arc<QuizCatalog>,
    results: ResultRepository,
    sessions: SessionMap,
}

impl SessionService {
    pub fn new(catalog: Arc<QuizCatalog>, results: ResultRepository) -> Self {
        Self {
            catalog,
            results,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts a fresh attempt, replacing any live attempt at the same quiz.
    pub async fn start(&self, quiz_id: &str) -> StartOutcome {
        let session = match QuizSession::load(&self.catalog, quiz_id) {
            LoadOutcome::Started(session) => session,
            LoadOutcome::RedirectToCatalog => return StartOutcome::RedirectToCatalog,
        };

        let session_id = Uuid::new_v4();
        let mut sessions = self.sessions.lock().await;

        let stale: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, active)| active.session.quiz().id == quiz_id)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            sessions.remove(&id);
            tracing::info!(session_id = %id, quiz_id, "Replaced unfinished session");
        }

        let timer = {
            let sessions = Arc::clone(&self.sessions);
            let results = self.results.clone();
            spawn_countdown(session.remaining_seconds(), move |event| {
                let sessions = Arc::clone(&sessions);
                let results = results.clone();
                async move { on_timer_event(sessions, results, session_id, event).await }
            })
        };

        let snapshot = SessionSnapshot::of(session_id, &session);
        sessions.insert(
            session_id,
            ActiveSession {
                session,
                _timer: timer,
            },
        );
        tracing::info!(%session_id, quiz_id, "Quiz session started");
        StartOutcome::Started(snapshot)
    }

    pub async fn snapshot(&self, session_id: Uuid) -> Result<SessionSnapshot> {
        self.with_session(session_id, |session| Ok(SessionSnapshot::of(session_id, session)))
            .await
    }

    pub async fn answer(
        &self,
        session_id: Uuid,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<SessionSnapshot> {
        self.with_session(session_id, |session| {
            session.answer(question_id, value)?;
            Ok(SessionSnapshot::of(session_id, session))
        })
        .await
    }

    pub async fn next(&self, session_id: Uuid) -> Result<SessionSnapshot> {
        self.with_session(session_id, |session| {
            session.next()?;
            Ok(SessionSnapshot::of(session_id, session))
        })
        .await
    }

    pub async fn previous(&self, session_id: Uuid) -> Result<SessionSnapshot> {
        self.with_session(session_id, |session| {
            session.previous()?;
            Ok(SessionSnapshot::of(session_id, session))
        })
        .await
    }

    pub async fn cancel_submit(&self, session_id: Uuid) -> Result<SessionSnapshot> {
        self.with_session(session_id, |session| {
            session.cancel_submit()?;
            Ok(SessionSnapshot::of(session_id, session))
        })
        .await
    }

    /// Submits the attempt, stores the result, then stops its timer.
    ///
    /// A failed save leaves the session awaiting confirmation so it can be retried.
    pub async fn confirm_submit(&self, session_id: Uuid) -> Result<QuizResult> {
        let mut sessions = self.sessions.lock().await;
        let active = sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;

        let mut submitted = active.session.clone();
        let result = submitted.confirm_submit()?;
        if let Err(e) = self.results.save(&result).await {
            tracing::error!(%session_id, error = ?e, "Failed to store submitted result");
            return Err(e);
        }

        // Removing the entry drops the timer handle.
        sessions.remove(&session_id);
        tracing::info!(%session_id, quiz_id = %result.quiz_id, score = result.score, "Quiz submitted");
        Ok(result)
    }

    /// Ends the attempt without a result.
    pub async fn abandon(&self, session_id: Uuid) -> Result<()> {
        let removed = self.sessions.lock().await.remove(&session_id);
        match removed {
            Some(active) => {
                tracing::info!(%session_id, quiz_id = %active.session.quiz().id, "Quiz session abandoned");
                Ok(())
            }
            None => Err(session_not_found(session_id)),
        }
    }

    pub async fn result(&self, quiz_id: &str) -> Result<QuizResult> {
        self.results
            .load(quiz_id)
            .await?
            .ok_or_else(|| Error::ResultNotFound(quiz_id.to_string()))
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn with_session<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut QuizSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.lock().await;
        let active = sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        f(&mut active.session)
    }
}

fn session_not_found(session_id: Uuid) -> Error {
    Error::NotFound(format!("Session {} not found", session_id))
}

async fn on_timer_event(
    sessions: SessionMap,
    results: ResultRepository,
    session_id: Uuid,
    event: TimerEvent,
) {
    let mut guard = sessions.lock().await;
    let Some(active) = guard.get_mut(&session_id) else {
        return;
    };
    let Some(result) = active.session.on_timer(event) else {
        return;
    };

    // Persist while still holding the entry, then drop it (and this timer) last.
    if let Err(e) = results.save(&result).await {
        tracing::error!(%session_id, error = ?e, "Failed to store result of expired session");
    }
    guard.remove(&session_id);
    tracing::info!(%session_id, quiz_id = %result.quiz_id, "Quiz auto-submitted on timeout");
}
