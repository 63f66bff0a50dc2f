#![allow(missing_docs)]

pub mod bind;
pub mod clock;
pub mod config;
pub mod form;
pub mod info;
pub mod record;
pub mod render;
pub mod spec;
pub mod surface;
pub mod trial;
pub mod widget;

pub use bind::{BindError, bind_widgets};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RenderConfig, RequiredPolicy};
pub use form::{Form, QuestionBlock, SelectControl, SubmitControl, TextBlock, build_form};
pub use info::{ParameterInfo, ParameterType, PluginInfo, parameter_schema, plugin_info};
pub use record::{QuestionResponse, ResponseRecord, Responses};
pub use render::{render_html, render_text};
pub use spec::{NormalizedTrial, SpecError, TrialSpec};
pub use surface::{DisplaySurface, MemorySurface};
pub use trial::{ResponseError, Trial, TrialError};
pub use widget::{Answer, Choice, ChoicesConfig, ChoicesWidget, SelectionMode, WidgetError};
