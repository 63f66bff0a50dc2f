use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RenderConfig;
use crate::spec::NormalizedTrial;
use crate::widget::SelectionMode;

/// Text or author HTML shown above the questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: String,
    pub class: String,
    pub html: String,
}

/// Plain `<select>` placeholder that a selection widget later enhances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectControl {
    pub id: String,
    pub name: String,
    pub mode: SelectionMode,
    pub required: bool,
    /// Disabled first option; only single-select controls have one.
    pub placeholder: Option<String>,
    /// Set once a widget has attached to the control.
    pub enhanced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBlock {
    pub index: usize,
    pub prompt: String,
    pub prompt_class: String,
    pub control: SelectControl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitControl {
    pub id: String,
    pub class: String,
    pub label: String,
}

/// The complete trial form in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub preamble: TextBlock,
    pub superq: Option<TextBlock>,
    pub questions: Vec<QuestionBlock>,
    pub submit: SubmitControl,
}

impl Form {
    pub fn control(&self, id: &str) -> Option<&SelectControl> {
        self.questions
            .iter()
            .map(|question| &question.control)
            .find(|control| control.id == id)
    }

    pub fn control_mut(&mut self, id: &str) -> Option<&mut SelectControl> {
        self.questions
            .iter_mut()
            .map(|question| &mut question.control)
            .find(|control| control.id == id)
    }
}

/// Builds the form structure for a normalized trial. The preamble block is always present so
/// the markup keeps the same shape whether or not the author supplied one.
pub fn build_form(trial: &NormalizedTrial, config: &RenderConfig) -> Form {
    let preamble = TextBlock {
        id: config.preamble_id(),
        class: config.preamble_id(),
        html: trial.preamble.clone(),
    };
    let superq = trial.superq.as_ref().map(|text| TextBlock {
        id: config.superq_id(),
        class: config.preamble_id(),
        html: text.clone(),
    });

    let questions = trial
        .questions
        .iter()
        .enumerate()
        .map(|(index, prompt)| {
            let mode = trial.mode(index);
            let id = config.control_id(index);
            let placeholder = match mode {
                SelectionMode::Single => Some(config.single_placeholder.clone()),
                SelectionMode::Multiple => None,
            };
            QuestionBlock {
                index,
                prompt: prompt.clone(),
                prompt_class: config.prompt_class(),
                control: SelectControl {
                    name: id.clone(),
                    id,
                    mode,
                    required: trial.is_required(index),
                    placeholder,
                    enhanced: false,
                },
            }
        })
        .collect::<Vec<_>>();

    debug!(questions = questions.len(), "built dropdown form");

    Form {
        id: config.form_id(),
        preamble,
        superq,
        questions,
        submit: SubmitControl {
            id: config.submit_id(),
            class: config.submit_class(),
            label: config.submit_label.clone(),
        },
    }
}
