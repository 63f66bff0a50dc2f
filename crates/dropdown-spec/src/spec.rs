use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::widget::SelectionMode;

/// Errors raised while loading or normalizing a trial specification.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to parse trial specification: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("trial has {questions} questions but {options} option lists")]
    LengthMismatch { questions: usize, options: usize },
}

/// Trial parameters as supplied by the host runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrialSpec {
    /// HTML shown above all questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
    /// Shared header shown between the preamble and the questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superq: Option<String>,
    /// Question prompts, one per dropdown.
    pub questions: Vec<String>,
    /// Candidate answers per question, in display order.
    pub options: Vec<Vec<String>>,
    /// Whether each question accepts several answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_multiple: Option<Vec<bool>>,
    /// Whether each question must be answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<bool>>,
}

impl TrialSpec {
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        serde_json::from_str(json).map_err(SpecError::Parse)
    }

    /// Fills defaults for the optional parameters and rejects mismatched question/option lists.
    pub fn normalize(self) -> Result<NormalizedTrial, SpecError> {
        if self.questions.len() != self.options.len() {
            return Err(SpecError::LengthMismatch {
                questions: self.questions.len(),
                options: self.options.len(),
            });
        }

        Ok(NormalizedTrial {
            preamble: self.preamble.unwrap_or_default(),
            superq: self.superq.filter(|text| !text.is_empty()),
            questions: self.questions,
            options: self.options,
            select_multiple: self.select_multiple.unwrap_or_default(),
            required: self.required.unwrap_or_default(),
        })
    }
}

/// Trial specification with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTrial {
    pub preamble: String,
    pub superq: Option<String>,
    pub questions: Vec<String>,
    pub options: Vec<Vec<String>>,
    select_multiple: Vec<bool>,
    required: Vec<bool>,
}

impl NormalizedTrial {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Flags past the end of `select_multiple` read as `false`.
    pub fn is_multiple(&self, index: usize) -> bool {
        flag_at(&self.select_multiple, index)
    }

    /// Flags past the end of `required` read as `false`.
    pub fn is_required(&self, index: usize) -> bool {
        flag_at(&self.required, index)
    }

    pub fn mode(&self, index: usize) -> SelectionMode {
        if self.is_multiple(index) {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        }
    }

    pub fn options_for(&self, index: usize) -> &[String] {
        self.options.get(index).map(Vec::as_slice).unwrap_or_default()
    }
}

fn flag_at(flags: &[bool], index: usize) -> bool {
    flags.get(index).copied().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_questions() -> TrialSpec {
        TrialSpec {
            questions: vec!["Favorite color?".into(), "Pick fruits".into()],
            options: vec![
                vec!["Red".into(), "Blue".into(), "Green".into()],
                vec!["Apple".into(), "Banana".into(), "Cherry".into()],
            ],
            ..TrialSpec::default()
        }
    }

    #[test]
    fn normalize_fills_defaults() {
        let trial = two_questions().normalize().expect("normalize");
        assert_eq!(trial.preamble, "");
        assert_eq!(trial.superq, None);
        assert!(!trial.is_multiple(0));
        assert!(!trial.is_required(1));
    }

    #[test]
    fn short_flag_lists_read_as_false() {
        let mut spec = two_questions();
        spec.select_multiple = Some(vec![true]);
        spec.required = Some(vec![true]);
        let trial = spec.normalize().expect("normalize");
        assert_eq!(trial.mode(0), SelectionMode::Multiple);
        assert_eq!(trial.mode(1), SelectionMode::Single);
        assert!(trial.is_required(0));
        assert!(!trial.is_required(1));
        assert!(!trial.is_required(42));
    }

    #[test]
    fn empty_superq_is_absent() {
        let mut spec = two_questions();
        spec.superq = Some(String::new());
        assert_eq!(spec.normalize().expect("normalize").superq, None);
    }

    #[test]
    fn mismatched_options_are_rejected() {
        let mut spec = two_questions();
        spec.options.pop();
        match spec.normalize() {
            Err(SpecError::LengthMismatch { questions, options }) => {
                assert_eq!((questions, options), (2, 1));
            }
            other => panic!("expected length mismatch, got {other:?}"),
        }
    }

    #[test]
    fn missing_questions_fail_to_parse() {
        let err = TrialSpec::from_json(r#"{"options": []}"#).unwrap_err();
        assert!(err.to_string().contains("questions"));
    }
}
