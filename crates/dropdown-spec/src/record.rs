use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::spec::NormalizedTrial;
use crate::widget::Answer;

/// Prompt and answer of one question at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResponse {
    pub prompt: String,
    pub answer: Answer,
}

/// Ordered response mapping, serialized as `{"Q0": prompt, "A0": answer, "Q1": ...}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Responses(Vec<QuestionResponse>);

impl Responses {
    pub fn collect(trial: &NormalizedTrial, answers: Vec<Answer>) -> Self {
        Self(
            trial
                .questions
                .iter()
                .zip(answers)
                .map(|(prompt, answer)| QuestionResponse {
                    prompt: prompt.clone(),
                    answer,
                })
                .collect(),
        )
    }
}

impl Serialize for Responses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len() * 2))?;
        for (index, response) in self.0.iter().enumerate() {
            map.serialize_entry(&format!("Q{index}"), &response.prompt)?;
            map.serialize_entry(&format!("A{index}"), &response.answer)?;
        }
        map.end()
    }
}

/// Result of one trial, handed to the host's completion callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Milliseconds between the form being shown and the submit.
    pub rt: u64,
    pub preamble: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superq: Option<String>,
    /// JSON-encoded response mapping.
    pub responses: String,
}

impl ResponseRecord {
    pub fn new(
        rt: u64,
        trial: &NormalizedTrial,
        responses: &Responses,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            rt,
            preamble: trial.preamble.clone(),
            superq: trial.superq.clone(),
            responses: serde_json::to_string(responses)?,
        })
    }
}
