use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bind::{BindError, bind_widgets};
use crate::clock::Clock;
use crate::config::{RenderConfig, RequiredPolicy};
use crate::form::build_form;
use crate::record::{ResponseRecord, Responses};
use crate::spec::{NormalizedTrial, SpecError, TrialSpec};
use crate::surface::DisplaySurface;
use crate::widget::{Answer, ChoicesWidget, WidgetError};

/// Errors that abort a trial before it is shown.
#[derive(Debug, Error)]
pub enum TrialError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Errors raised by participant input and submission.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("trial has already finished")]
    AlreadyFinished,
    #[error("required questions are unanswered: {0:?}")]
    MissingRequired(Vec<usize>),
    #[error("question {0} does not exist")]
    UnknownQuestion(usize),
    #[error("question {index}: {source}")]
    Widget {
        index: usize,
        #[source]
        source: WidgetError,
    },
    #[error("failed to encode responses: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One running dropdown trial.
///
/// The trial owns its widgets and the completion callback. The callback is consumed by the
/// first successful [`Trial::submit`], so it runs at most once.
pub struct Trial<C, F> {
    spec: NormalizedTrial,
    policy: RequiredPolicy,
    widgets: Vec<ChoicesWidget>,
    clock: C,
    started_at: u64,
    on_finish: Option<F>,
}

impl<C, F> Trial<C, F>
where
    C: Clock,
    F: FnOnce(ResponseRecord),
{
    /// Normalizes `spec`, mounts the form on `surface`, binds the widgets and starts timing.
    /// A failed bind clears `surface` again.
    pub fn start<S>(
        spec: TrialSpec,
        config: &RenderConfig,
        surface: &mut S,
        clock: C,
        on_finish: F,
    ) -> Result<Self, TrialError>
    where
        S: DisplaySurface + ?Sized,
    {
        let spec = spec.normalize()?;
        surface.mount(build_form(&spec, config));
        let started_at = clock.now_ms();
        let widgets = match bind_widgets(&spec, config, surface) {
            Ok(widgets) => widgets,
            Err(err) => {
                surface.clear();
                return Err(err.into());
            }
        };
        debug!(questions = spec.question_count(), "dropdown trial started");

        Ok(Self {
            spec,
            policy: config.required_policy,
            widgets,
            clock,
            started_at,
            on_finish: Some(on_finish),
        })
    }

    pub fn spec(&self) -> &NormalizedTrial {
        &self.spec
    }

    pub fn widgets(&self) -> &[ChoicesWidget] {
        &self.widgets
    }

    pub fn widget(&self, index: usize) -> Option<&ChoicesWidget> {
        self.widgets.get(index)
    }

    pub fn is_finished(&self) -> bool {
        self.on_finish.is_none()
    }

    fn widget_mut(&mut self, index: usize) -> Result<&mut ChoicesWidget, ResponseError> {
        if self.is_finished() {
            return Err(ResponseError::AlreadyFinished);
        }
        self.widgets
            .get_mut(index)
            .ok_or(ResponseError::UnknownQuestion(index))
    }

    pub fn select(&mut self, index: usize, value: &str) -> Result<(), ResponseError> {
        self.widget_mut(index)?
            .select(value)
            .map_err(|source| ResponseError::Widget { index, source })
    }

    pub fn deselect(&mut self, index: usize, value: &str) -> Result<(), ResponseError> {
        self.widget_mut(index)?.deselect(value);
        Ok(())
    }

    pub fn set_answer(&mut self, index: usize, answer: &Answer) -> Result<(), ResponseError> {
        self.widget_mut(index)?
            .set_answer(answer)
            .map_err(|source| ResponseError::Widget { index, source })
    }

    /// Indices of required questions that have no answer yet.
    pub fn unanswered_required(&self) -> Vec<usize> {
        self.widgets
            .iter()
            .enumerate()
            .filter(|(index, widget)| self.spec.is_required(*index) && widget.value().is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    /// Collects every answer, clears `surface` and hands the record to the completion callback.
    ///
    /// Under [`RequiredPolicy::Block`] a submit with unanswered required questions is rejected
    /// and leaves the form in place.
    pub fn submit<S>(&mut self, surface: &mut S) -> Result<(), ResponseError>
    where
        S: DisplaySurface + ?Sized,
    {
        if self.is_finished() {
            return Err(ResponseError::AlreadyFinished);
        }
        let rt = self.clock.now_ms().saturating_sub(self.started_at);

        if self.policy == RequiredPolicy::Block {
            let missing = self.unanswered_required();
            if !missing.is_empty() {
                warn!(?missing, "submit rejected, required questions unanswered");
                return Err(ResponseError::MissingRequired(missing));
            }
        }

        let answers = self.widgets.iter().map(ChoicesWidget::value).collect();
        let responses = Responses::collect(&self.spec, answers);
        let record =
            ResponseRecord::new(rt, &self.spec, &responses).map_err(ResponseError::Encode)?;

        surface.clear();
        self.widgets.clear();
        let on_finish = self
            .on_finish
            .take()
            .ok_or(ResponseError::AlreadyFinished)?;
        info!(rt, questions = self.spec.question_count(), "dropdown trial finished");
        on_finish(record);
        Ok(())
    }
}
