use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "question")]
    pub prompt: String,
    pub points: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    MultipleChoice {
        options: Vec<String>,
        #[serde(rename = "correctAnswer")]
        correct_answer: usize,
    },
    #[serde(rename = "coding")]
    Coding {
        #[serde(rename = "initialCode", default)]
        initial_code: String,
        #[serde(rename = "testCases", default)]
        test_cases: Vec<TestCase>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    #[serde(rename = "expectedOutput")]
    pub expected_output: String,
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::MultipleChoice { .. })
    }

    pub fn is_coding(&self) -> bool {
        matches!(self.kind, QuestionKind::Coding { .. })
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            QuestionKind::MultipleChoice { .. } => "mcq",
            QuestionKind::Coding { .. } => "coding",
        }
    }
}
