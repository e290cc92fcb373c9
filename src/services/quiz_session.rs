use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::answer::AnswerValue;
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use crate::models::quiz_result::QuizResult;
use crate::services::answer_store::AnswerStore;
use crate::services::catalog_service::QuizCatalog;
use crate::services::scoring_service::ScoringService;
use crate::services::timer_service::TimerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    ConfirmingSubmit,
    Submitted,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionState::InProgress => "in_progress",
            SessionState::ConfirmingSubmit => "confirming_submit",
            SessionState::Submitted => "submitted",
        };
        f.write_str(label)
    }
}

/// Outcome of resolving a quiz id against the catalog.
#[derive(Debug)]
pub enum LoadOutcome {
    Started(QuizSession),
    RedirectToCatalog,
}

/// One learner's attempt at a quiz.
///
/// Transitions are synchronous. Time only moves through [`QuizSession::on_timer`],
/// so the caller owns the timer and must stop it once the session is submitted.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    state: SessionState,
    current_index: usize,
    answers: AnswerStore,
    remaining_seconds: u32,
}

impl QuizSession {
    pub fn load(catalog: &QuizCatalog, quiz_id: &str) -> LoadOutcome {
        match catalog.find(quiz_id) {
            Some(quiz) => LoadOutcome::Started(Self::start(quiz.clone())),
            None => {
                tracing::info!("Quiz '{}' not in catalog, redirecting to quiz list", quiz_id);
                LoadOutcome::RedirectToCatalog
            }
        }
    }

    pub fn start(quiz: Quiz) -> Self {
        let remaining_seconds = quiz.time_limit_seconds();
        Self {
            quiz,
            state: SessionState::InProgress,
            current_index: 0,
            answers: AnswerStore::new(),
            remaining_seconds,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current_index)
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        ScoringService::elapsed_seconds(self.quiz.time_limit_seconds(), self.remaining_seconds)
    }

    fn last_index(&self) -> usize {
        self.quiz.questions.len().saturating_sub(1)
    }

    fn require(&self, expected: SessionState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                state: self.state.to_string(),
                action,
            })
        }
    }

    pub fn answer(&mut self, question_id: &str, value: AnswerValue) -> Result<()> {
        self.require(SessionState::InProgress, "answer")?;
        if self.quiz.question(question_id).is_none() {
            return Err(Error::BadRequest(format!(
                "Question '{}' is not part of quiz '{}'",
                question_id, self.quiz.id
            )));
        }
        self.answers.set_answer(question_id, value);
        Ok(())
    }

    /// Moves forward; past the last question the session asks for confirmation.
    pub fn next(&mut self) -> Result<SessionState> {
        self.require(SessionState::InProgress, "advance")?;
        if self.current_index < self.last_index() {
            self.current_index += 1;
        } else {
            self.state = SessionState::ConfirmingSubmit;
        }
        Ok(self.state)
    }

    pub fn previous(&mut self) -> Result<SessionState> {
        self.require(SessionState::InProgress, "go back")?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(self.state)
    }

    pub fn cancel_submit(&mut self) -> Result<()> {
        self.require(SessionState::ConfirmingSubmit, "cancel submission")?;
        self.state = SessionState::InProgress;
        self.current_index = self.last_index();
        Ok(())
    }

    pub fn confirm_submit(&mut self) -> Result<QuizResult> {
        self.require(SessionState::ConfirmingSubmit, "confirm submission")?;
        Ok(self.submit())
    }

    /// Applies a timer event; expiry submits from any live state.
    pub fn on_timer(&mut self, event: TimerEvent) -> Option<QuizResult> {
        if self.state == SessionState::Submitted {
            return None;
        }
        match event {
            TimerEvent::Tick { remaining } => {
                self.remaining_seconds = remaining.min(self.remaining_seconds);
                None
            }
            TimerEvent::Expired => {
                self.remaining_seconds = 0;
                tracing::info!("Time is up for quiz '{}', submitting", self.quiz.id);
                Some(self.submit())
            }
        }
    }

    fn submit(&mut self) -> QuizResult {
        self.state = SessionState::Submitted;
        ScoringService::score(&self.quiz, &self.answers, self.elapsed_seconds())
    }
}
