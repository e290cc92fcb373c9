use serde::{Deserialize, Serialize};

/// A learner's response: an option index for multiple choice, source text for coding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(usize),
    Code(String),
}

impl AnswerValue {
    pub fn as_choice(&self) -> Option<usize> {
        match self {
            AnswerValue::Choice(idx) => Some(*idx),
            AnswerValue::Code(_) => None,
        }
    }

    pub fn as_code(&self) -> Option<&str> {
        match self {
            AnswerValue::Code(code) => Some(code),
            AnswerValue::Choice(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_choices_and_strings_are_code() {
        let choice: AnswerValue = serde_json::from_str("2").unwrap();
        let code: AnswerValue = serde_json::from_str("\"print(1)\"").unwrap();
        assert_eq!(choice.as_choice(), Some(2));
        assert_eq!(code.as_code(), Some("print(1)"));
        assert_eq!(code.as_choice(), None);
    }
}
