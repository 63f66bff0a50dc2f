use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use dropdown_spec::{
    Answer, DisplaySurface, ManualClock, MemorySurface, RenderConfig, ResponseError,
    ResponseRecord, SpecError, Trial, TrialError, TrialSpec,
    parameter_schema as spec_parameter_schema, plugin_info, render::RenderError,
    render_html as spec_render_html,
};

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse selections: {0}")]
    SelectionsParse(#[source] serde_json::Error),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Trial(#[from] TrialError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error("trial finished without producing a record")]
    NoRecord,
}

/// One entry per question; `null` leaves the question unanswered.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct Selections(Vec<Option<Answer>>);

fn load_config(config_json: &str) -> Result<RenderConfig, ComponentError> {
    RenderConfig::from_json(config_json).map_err(ComponentError::ConfigParse)
}

fn load_trial(trial_json: &str) -> Result<TrialSpec, ComponentError> {
    Ok(TrialSpec::from_json(trial_json)?)
}

fn parse_selections(selections_json: &str) -> Result<Selections, ComponentError> {
    if selections_json.trim().is_empty() {
        return Ok(Selections(Vec::new()));
    }
    serde_json::from_str(selections_json).map_err(ComponentError::SelectionsParse)
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

fn respond_string(result: Result<String, ComponentError>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

/// Plugin name and parameter declarations.
pub fn describe() -> String {
    respond(serde_json::to_value(plugin_info()).map_err(ComponentError::JsonEncode))
}

pub fn parameter_schema() -> String {
    respond(spec_parameter_schema().map_err(ComponentError::JsonEncode))
}

/// Mounts a trial on a scratch surface without ever submitting it.
fn mount(
    trial_json: &str,
    config_json: &str,
) -> Result<(MemorySurface, Trial<ManualClock, impl FnOnce(ResponseRecord)>), ComponentError> {
    let spec = load_trial(trial_json)?;
    let config = load_config(config_json)?;
    let mut surface = MemorySurface::new();
    let trial = Trial::start(
        spec,
        &config,
        &mut surface,
        ManualClock::default(),
        |_: ResponseRecord| {},
    )?;
    Ok((surface, trial))
}

pub fn render_html(trial_json: &str, config_json: &str) -> String {
    respond_string(mount(trial_json, config_json).and_then(|(surface, _trial)| {
        spec_render_html(&surface).map_err(ComponentError::from)
    }))
}

/// Mounted form structure plus the widget configuration of every question.
pub fn render_json(trial_json: &str, config_json: &str) -> String {
    respond(mount(trial_json, config_json).and_then(|(surface, trial)| {
        let widgets = trial
            .widgets()
            .iter()
            .map(|widget| -> Result<Value, ComponentError> {
                let config =
                    serde_json::to_value(widget.config()).map_err(ComponentError::JsonEncode)?;
                Ok(json!({
                    "control_id": widget.control_id(),
                    "mode": widget.mode(),
                    "config": config,
                }))
            })
            .collect::<Result<Vec<_>, ComponentError>>()?;
        let forms = serde_json::to_value(surface.forms()).map_err(ComponentError::JsonEncode)?;
        Ok(json!({
            "forms": forms,
            "widgets": widgets,
        }))
    }))
}

/// Replays a participant's selections and returns the resulting response record.
pub fn run_trial(trial_json: &str, config_json: &str, selections_json: &str, rt_ms: u64) -> String {
    respond(replay(trial_json, config_json, selections_json, rt_ms))
}

fn replay(
    trial_json: &str,
    config_json: &str,
    selections_json: &str,
    rt_ms: u64,
) -> Result<Value, ComponentError> {
    let spec = load_trial(trial_json)?;
    let config = load_config(config_json)?;
    let Selections(selections) = parse_selections(selections_json)?;
    let clock = ManualClock::default();
    let mut surface = MemorySurface::new();
    let mut record = None;
    {
        let mut trial = Trial::start(
            spec,
            &config,
            &mut surface,
            clock.clone(),
            |finished: ResponseRecord| record = Some(finished),
        )?;
        for (index, answer) in selections.iter().enumerate() {
            if let Some(answer) = answer {
                trial.set_answer(index, answer)?;
            }
        }
        clock.advance(rt_ms);
        trial.submit(&mut surface)?;
    }
    let record = record.ok_or(ComponentError::NoRecord)?;
    debug!(rt = record.rt, "replayed dropdown trial");
    serde_json::to_value(record).map_err(ComponentError::JsonEncode)
}
