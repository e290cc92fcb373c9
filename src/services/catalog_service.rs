use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::quiz::Quiz;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Read-only set of quiz definitions, validated on load.
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    quizzes: Vec<Quiz>,
}

impl QuizCatalog {
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self> {
        let mut ids = HashSet::new();
        for quiz in &quizzes {
            quiz.validate()?;
            if !ids.insert(quiz.id.as_str()) {
                return Err(Error::Catalog(format!("duplicate quiz id '{}'", quiz.id)));
            }
        }
        Ok(Self { quizzes })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let quizzes: Vec<Quiz> = serde_json::from_str(raw)
            .map_err(|e| Error::Catalog(format!("invalid catalog JSON: {}", e)))?;
        Self::new(quizzes)
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    /// Loads the catalog at `path` when one is configured, the built-in one otherwise.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                tracing::info!("Loading quiz catalog from {}", path.display());
                Self::from_file(path).await?
            }
            None => Self::builtin()?,
        };
        tracing::info!("Quiz catalog ready with {} quizzes", catalog.quizzes.len());
        Ok(catalog)
    }

    pub fn find(&self, quiz_id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == quiz_id)
    }

    pub fn list(&self) -> &[Quiz] {
        &self.quizzes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = QuizCatalog::builtin().unwrap();
        assert_eq!(catalog.list().len(), 2);

        let basics = catalog.find("python-basics-1").unwrap();
        assert_eq!(basics.time_limit, 15);
        assert_eq!(basics.questions.len(), 5);
        assert_eq!(basics.mcq_count(), 3);
        assert_eq!(basics.coding_count(), 2);
        assert_eq!(basics.total_points(), 16);

        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn duplicate_quiz_ids_are_rejected() {
        let raw = r#"[
            {"id":"a","title":"A","description":"","timeLimit":1,
             "questions":[{"id":"q1","type":"coding","question":"?","points":1}]},
            {"id":"a","title":"B","description":"","timeLimit":1,
             "questions":[{"id":"q1","type":"coding","question":"?","points":1}]}
        ]"#;
        let err = QuizCatalog::from_json(raw).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn catalog_with_overflowing_points_is_rejected() {
        let raw = r#"[
            {"id":"big","title":"Big","description":"","timeLimit":1,
             "questions":[
                {"id":"q1","type":"coding","question":"?","points":4000000000},
                {"id":"q2","type":"coding","question":"?","points":4000000000}
             ]}
        ]"#;
        assert!(matches!(QuizCatalog::from_json(raw), Err(Error::Catalog(_))));
    }

    #[test]
    fn malformed_json_is_a_catalog_error() {
        assert!(matches!(
            QuizCatalog::from_json("{not json"),
            Err(Error::Catalog(_))
        ));
    }
}
