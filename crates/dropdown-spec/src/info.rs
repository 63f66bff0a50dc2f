use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use crate::spec::TrialSpec;

pub const PLUGIN_NAME: &str = "dropdown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Bool,
    String,
}

/// Declaration of one trial parameter for the host's parameter layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub array: bool,
    /// `None` marks a parameter the host must supply.
    pub default: Option<Value>,
    pub no_function: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterInfo>,
}

impl PluginInfo {
    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }
}

fn parameter(
    name: &'static str,
    kind: ParameterType,
    array: bool,
    default: Option<Value>,
    description: &'static str,
) -> ParameterInfo {
    ParameterInfo {
        name,
        kind,
        array,
        default,
        no_function: false,
        description,
    }
}

pub fn plugin_info() -> PluginInfo {
    PluginInfo {
        name: PLUGIN_NAME,
        description: "Survey questions answered with single- or multi-select dropdowns.",
        parameters: vec![
            parameter(
                "select_multiple",
                ParameterType::Bool,
                true,
                Some(Value::Bool(false)),
                "Whether multiple choices can be selected",
            ),
            parameter(
                "questions",
                ParameterType::String,
                true,
                None,
                "Question prompts",
            ),
            parameter(
                "options",
                ParameterType::String,
                true,
                None,
                "Candidate answers for each question, in display order",
            ),
            parameter(
                "required",
                ParameterType::Bool,
                true,
                Some(Value::Bool(false)),
                "Whether each question must be answered",
            ),
            parameter(
                "preamble",
                ParameterType::String,
                false,
                Some(Value::String(String::new())),
                "HTML shown above the questions",
            ),
            parameter(
                "superq",
                ParameterType::String,
                false,
                Some(Value::String(String::new())),
                "Shared header shown above the questions",
            ),
        ],
    }
}

/// JSON Schema of [`TrialSpec`].
pub fn parameter_schema() -> Result<Value, serde_json::Error> {
    serde_json::to_value(schema_for!(TrialSpec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_and_options_have_no_default() {
        let info = plugin_info();
        assert_eq!(info.name, "dropdown");
        assert!(info.parameter("questions").expect("questions").default.is_none());
        assert!(info.parameter("options").expect("options").default.is_none());
        assert_eq!(
            info.parameter("preamble").expect("preamble").default,
            Some(Value::String(String::new()))
        );
    }

    #[test]
    fn schema_requires_questions_and_options() {
        let schema = parameter_schema().expect("schema");
        let required = schema["required"].as_array().expect("required list");
        assert!(required.iter().any(|value| value == "questions"));
        assert!(required.iter().any(|value| value == "options"));
        assert!(!required.iter().any(|value| value == "preamble"));
    }
}
