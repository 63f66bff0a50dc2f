use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a dropdown accepts one or several answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Single,
    Multiple,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error("'{0}' is not one of the available choices")]
    UnknownChoice(String),
    #[error("single-select dropdown cannot hold {0} values")]
    NotMultiple(usize),
}

/// One candidate answer; label and value are both the option text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

/// Configuration handed to the selection widget for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicesConfig {
    pub should_sort: bool,
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_value: Option<String>,
}

impl ChoicesConfig {
    /// Multi-select questions get a widget-level placeholder; single-select ones carry theirs
    /// as a disabled option in the control instead.
    pub fn for_question(options: &[String], mode: SelectionMode, placeholder_text: &str) -> Self {
        let choices = options
            .iter()
            .map(|option| Choice {
                label: option.clone(),
                value: option.clone(),
            })
            .collect();
        let (placeholder, placeholder_value) = match mode {
            SelectionMode::Multiple => (true, Some(placeholder_text.to_string())),
            SelectionMode::Single => (false, None),
        };
        Self {
            should_sort: false,
            choices,
            placeholder,
            placeholder_value,
        }
    }
}

/// Selected value(s) of one dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    /// True when nothing but the placeholder is selected.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Single(value) => value.is_empty(),
            Answer::Multiple(values) => values.is_empty(),
        }
    }
}

/// Selection-enhancement widget bound to one dropdown control.
#[derive(Debug, Clone)]
pub struct ChoicesWidget {
    control_id: String,
    mode: SelectionMode,
    config: ChoicesConfig,
    selected: Vec<String>,
}

impl ChoicesWidget {
    pub fn new(control_id: impl Into<String>, mode: SelectionMode, config: ChoicesConfig) -> Self {
        Self {
            control_id: control_id.into(),
            mode,
            config,
            selected: Vec::new(),
        }
    }

    pub fn control_id(&self) -> &str {
        &self.control_id
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn config(&self) -> &ChoicesConfig {
        &self.config
    }

    pub fn choices(&self) -> &[Choice] {
        &self.config.choices
    }

    fn ensure_choice(&self, value: &str) -> Result<(), WidgetError> {
        if self.config.choices.iter().any(|choice| choice.value == value) {
            Ok(())
        } else {
            Err(WidgetError::UnknownChoice(value.to_string()))
        }
    }

    /// Single mode replaces the current value; multiple mode appends in selection order.
    pub fn select(&mut self, value: &str) -> Result<(), WidgetError> {
        self.ensure_choice(value)?;
        match self.mode {
            SelectionMode::Single => {
                self.selected.clear();
                self.selected.push(value.to_string());
            }
            SelectionMode::Multiple => {
                if !self.selected.iter().any(|selected| selected == value) {
                    self.selected.push(value.to_string());
                }
            }
        }
        Ok(())
    }

    pub fn deselect(&mut self, value: &str) {
        self.selected.retain(|selected| selected != value);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replaces the whole selection; every value is checked before anything changes.
    pub fn set_answer(&mut self, answer: &Answer) -> Result<(), WidgetError> {
        let values: Vec<&str> = match answer {
            Answer::Single(value) if value.is_empty() => Vec::new(),
            Answer::Single(value) => vec![value.as_str()],
            Answer::Multiple(values) => values.iter().map(String::as_str).collect(),
        };
        if self.mode == SelectionMode::Single && values.len() > 1 {
            return Err(WidgetError::NotMultiple(values.len()));
        }
        for value in &values {
            self.ensure_choice(value)?;
        }
        self.clear();
        for value in values {
            self.select(value)?;
        }
        Ok(())
    }

    /// Single mode yields the placeholder's empty value until something is chosen.
    pub fn value(&self) -> Answer {
        match self.mode {
            SelectionMode::Single => {
                Answer::Single(self.selected.first().cloned().unwrap_or_default())
            }
            SelectionMode::Multiple => Answer::Multiple(self.selected.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["Zebra".into(), "Apple".into(), "None of the above".into()]
    }

    #[test]
    fn config_keeps_authoring_order() {
        let config = ChoicesConfig::for_question(&options(), SelectionMode::Single, "Select option");
        let values: Vec<_> = config.choices.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["Zebra", "Apple", "None of the above"]);
        assert!(!config.should_sort);
        assert!(config.choices.iter().all(|c| c.label == c.value));
    }

    #[test]
    fn multi_config_carries_placeholder() {
        let config =
            ChoicesConfig::for_question(&options(), SelectionMode::Multiple, "Select option");
        let json = serde_json::to_value(&config).expect("json");
        assert_eq!(json["shouldSort"], false);
        assert_eq!(json["placeholder"], true);
        assert_eq!(json["placeholderValue"], "Select option");

        let single = ChoicesConfig::for_question(&options(), SelectionMode::Single, "x");
        let json = serde_json::to_value(&single).expect("json");
        assert!(json.get("placeholder").is_none());
        assert!(json.get("placeholderValue").is_none());
    }

    #[test]
    fn single_select_replaces_value() {
        let config = ChoicesConfig::for_question(&options(), SelectionMode::Single, "");
        let mut widget = ChoicesWidget::new("q0", SelectionMode::Single, config);
        assert_eq!(widget.value(), Answer::Single(String::new()));
        widget.select("Zebra").unwrap();
        widget.select("Apple").unwrap();
        assert_eq!(widget.value(), Answer::Single("Apple".into()));
    }

    #[test]
    fn multi_select_starts_empty_and_ignores_duplicates() {
        let config = ChoicesConfig::for_question(&options(), SelectionMode::Multiple, "");
        let mut widget = ChoicesWidget::new("q1", SelectionMode::Multiple, config);
        assert_eq!(widget.value(), Answer::Multiple(vec![]));
        widget.select("Apple").unwrap();
        widget.select("Zebra").unwrap();
        widget.select("Apple").unwrap();
        assert_eq!(
            widget.value(),
            Answer::Multiple(vec!["Apple".into(), "Zebra".into()])
        );
        widget.deselect("Apple");
        assert_eq!(widget.value(), Answer::Multiple(vec!["Zebra".into()]));
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let config = ChoicesConfig::for_question(&options(), SelectionMode::Single, "");
        let mut widget = ChoicesWidget::new("q0", SelectionMode::Single, config);
        assert_eq!(
            widget.select("Mango"),
            Err(WidgetError::UnknownChoice("Mango".into()))
        );
    }

    #[test]
    fn set_answer_validates_before_changing() {
        let config = ChoicesConfig::for_question(&options(), SelectionMode::Single, "");
        let mut widget = ChoicesWidget::new("q0", SelectionMode::Single, config);
        widget.select("Apple").unwrap();
        let two = Answer::Multiple(vec!["Apple".into(), "Zebra".into()]);
        assert_eq!(widget.set_answer(&two), Err(WidgetError::NotMultiple(2)));
        assert_eq!(widget.value(), Answer::Single("Apple".into()));
        widget.set_answer(&Answer::Single(String::new())).unwrap();
        assert!(widget.value().is_empty());
    }
}
