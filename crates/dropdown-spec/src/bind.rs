use thiserror::Error;
use tracing::debug;

use crate::config::RenderConfig;
use crate::spec::NormalizedTrial;
use crate::surface::DisplaySurface;
use crate::widget::{ChoicesConfig, ChoicesWidget, SelectionMode};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("control '{0}' is not attached to the display surface")]
    MissingControl(String),
}

/// Attaches one selection widget per question to the controls already mounted on `surface`.
///
/// This is the second build phase: it must run after the form has been mounted, because each
/// widget takes over an existing control. The returned widgets are indexed by question.
pub fn bind_widgets<S>(
    trial: &NormalizedTrial,
    config: &RenderConfig,
    surface: &mut S,
) -> Result<Vec<ChoicesWidget>, BindError>
where
    S: DisplaySurface + ?Sized,
{
    let mut widgets = Vec::with_capacity(trial.question_count());
    for index in 0..trial.question_count() {
        let control_id = config.control_id(index);
        if !surface.contains_control(&control_id) {
            return Err(BindError::MissingControl(control_id));
        }
        if let Some(control) = surface.control_mut(&control_id) {
            control.enhanced = true;
        }

        let mode = trial.mode(index);
        let placeholder = match mode {
            SelectionMode::Multiple => config.multi_placeholder.as_str(),
            SelectionMode::Single => "",
        };
        let choices = ChoicesConfig::for_question(trial.options_for(index), mode, placeholder);
        debug!(question = index, ?mode, choices = choices.choices.len(), "bound selection widget");
        widgets.push(ChoicesWidget::new(control_id, mode, choices));
    }
    Ok(widgets)
}
