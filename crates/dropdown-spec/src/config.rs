use serde::{Deserialize, Serialize};

const DEFAULT_ID_PREFIX: &str = "jspsych-dropdown";
const DEFAULT_SINGLE_PLACEHOLDER: &str = "Please choose an answer";
const DEFAULT_MULTI_PLACEHOLDER: &str = "Select option";
const DEFAULT_SUBMIT_LABEL: &str = "Next";

/// How `required` flags affect submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequiredPolicy {
    /// Reject a submit while a required question is unanswered.
    #[default]
    Block,
    /// Only mark the control as required.
    Mark,
}

/// Presentation settings shared by every trial a host renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_single_placeholder")]
    pub single_placeholder: String,
    #[serde(default = "default_multi_placeholder")]
    pub multi_placeholder: String,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default)]
    pub required_policy: RequiredPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            single_placeholder: default_single_placeholder(),
            multi_placeholder: default_multi_placeholder(),
            submit_label: default_submit_label(),
            required_policy: RequiredPolicy::default(),
        }
    }
}

impl RenderConfig {
    /// Parses a config payload; blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(json)
        }
    }

    fn join(&self, parts: &[&str]) -> String {
        let mut id = self.id_prefix.clone();
        for part in parts {
            id.push('-');
            id.push_str(part);
        }
        id
    }

    pub fn form_id(&self) -> String {
        self.join(&["form"])
    }

    pub fn preamble_id(&self) -> String {
        self.join(&["preamble"])
    }

    pub fn superq_id(&self) -> String {
        self.join(&["superq"])
    }

    pub fn control_id(&self, index: usize) -> String {
        self.join(&[&index.to_string(), "choices"])
    }

    pub fn submit_id(&self) -> String {
        self.join(&["next"])
    }

    pub fn prompt_class(&self) -> String {
        format!("{} dropdown", self.join(&["text"]))
    }

    pub fn submit_class(&self) -> String {
        format!("{} jspsych-btn", self.id_prefix)
    }
}

fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

fn default_single_placeholder() -> String {
    DEFAULT_SINGLE_PLACEHOLDER.to_string()
}

fn default_multi_placeholder() -> String {
    DEFAULT_MULTI_PLACEHOLDER.to_string()
}

fn default_submit_label() -> String {
    DEFAULT_SUBMIT_LABEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_config_uses_defaults() {
        let config = RenderConfig::from_json("  ").expect("config");
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.control_id(3), "jspsych-dropdown-3-choices");
        assert_eq!(config.form_id(), "jspsych-dropdown-form");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config =
            RenderConfig::from_json(r#"{"id_prefix": "survey", "required_policy": "mark"}"#)
                .expect("config");
        assert_eq!(config.submit_id(), "survey-next");
        assert_eq!(config.submit_label, "Next");
        assert_eq!(config.required_policy, RequiredPolicy::Mark);
    }
}
