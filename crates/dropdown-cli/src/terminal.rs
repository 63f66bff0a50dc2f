use dropdown_spec::{Answer, ChoicesWidget, ResponseRecord, SelectionMode};

/// Controls which bits of state the terminal host prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Question prompts and the final record only.
    Clean,
    /// Also the rendered form summary and rejected submits.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints prompts for a running trial.
pub struct TrialPresenter {
    verbosity: Verbosity,
}

impl TrialPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn show_form(&self, summary: &str) {
        if self.verbosity.is_verbose() {
            println!("{}", summary);
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = format!("{}/{} {}", prompt.index + 1, prompt.total, prompt.title);
        if prompt.required {
            line.push_str(" *");
        }
        line.push(' ');
        line.push_str(prompt.hint());
        println!("{}", line);
        for (position, choice) in prompt.choices.iter().enumerate() {
            println!("  {}) {}", position + 1, choice);
        }
    }

    pub fn show_parse_error(&self, error: &SelectionParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_missing(&self, missing: &[usize]) {
        let numbers = missing
            .iter()
            .map(|index| (index + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Please answer the required questions: {}", numbers);
    }

    pub fn show_completion(&self, record: &ResponseRecord) -> Result<(), serde_json::Error> {
        if self.verbosity.is_verbose() {
            println!("Done ✅ ({} ms)", record.rt);
        }
        println!("{}", serde_json::to_string_pretty(record)?);
        Ok(())
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub required: bool,
    pub mode: SelectionMode,
    pub choices: Vec<String>,
}

impl PromptContext {
    pub fn new(
        index: usize,
        total: usize,
        title: &str,
        required: bool,
        widget: &ChoicesWidget,
    ) -> Self {
        Self {
            index,
            total,
            title: title.to_string(),
            required,
            mode: widget.mode(),
            choices: widget
                .choices()
                .iter()
                .map(|choice| choice.label.clone())
                .collect(),
        }
    }

    fn hint(&self) -> &'static str {
        match self.mode {
            SelectionMode::Single => "(pick one number)",
            SelectionMode::Multiple => "(comma-separated numbers, blank for none)",
        }
    }
}

/// Error produced when parsing a selection typed by the participant.
#[derive(Debug)]
pub struct SelectionParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl SelectionParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Accepts option numbers (1-based) or option text, case-insensitively. Blank means no answer.
pub fn parse_selection(prompt: &PromptContext, raw: &str) -> Result<Answer, SelectionParseError> {
    let raw = raw.trim();
    let tokens: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    match prompt.mode {
        SelectionMode::Single => match tokens.as_slice() {
            [] => Ok(Answer::Single(String::new())),
            [token] => resolve_choice(prompt, token).map(Answer::Single),
            _ => Err(SelectionParseError::new(
                "This question takes a single answer.",
                Some(format!("one of 1..{}", prompt.choices.len())),
            )),
        },
        SelectionMode::Multiple => tokens
            .iter()
            .map(|token| resolve_choice(prompt, token))
            .collect::<Result<Vec<_>, _>>()
            .map(Answer::Multiple),
    }
}

fn resolve_choice(prompt: &PromptContext, token: &str) -> Result<String, SelectionParseError> {
    if let Ok(number) = token.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|position| prompt.choices.get(position))
            .cloned()
            .ok_or_else(|| {
                SelectionParseError::new(
                    format!("There is no option {}.", number),
                    Some(format!("a number between 1 and {}", prompt.choices.len())),
                )
            });
    }
    prompt
        .choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(token))
        .cloned()
        .ok_or_else(|| {
            SelectionParseError::new(
                format!("Choose one of: {}.", prompt.choices.join(", ")),
                Some(format!("allowed values: {}", prompt.choices.join(", "))),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(mode: SelectionMode) -> PromptContext {
        PromptContext {
            index: 0,
            total: 1,
            title: "Pick".into(),
            required: false,
            mode,
            choices: vec!["Apple".into(), "Banana".into(), "Cherry".into()],
        }
    }

    #[test]
    fn single_accepts_number_or_text() {
        let single = prompt(SelectionMode::Single);
        assert_eq!(
            parse_selection(&single, "2").unwrap(),
            Answer::Single("Banana".into())
        );
        assert_eq!(
            parse_selection(&single, "cherry").unwrap(),
            Answer::Single("Cherry".into())
        );
        assert_eq!(
            parse_selection(&single, "").unwrap(),
            Answer::Single(String::new())
        );
    }

    #[test]
    fn single_rejects_several_answers() {
        assert!(parse_selection(&prompt(SelectionMode::Single), "1,2").is_err());
    }

    #[test]
    fn multiple_keeps_typed_order() {
        assert_eq!(
            parse_selection(&prompt(SelectionMode::Multiple), "3, 1").unwrap(),
            Answer::Multiple(vec!["Cherry".into(), "Apple".into()])
        );
        assert_eq!(
            parse_selection(&prompt(SelectionMode::Multiple), " ").unwrap(),
            Answer::Multiple(vec![])
        );
    }

    #[test]
    fn out_of_range_number_is_rejected() {
        let err = parse_selection(&prompt(SelectionMode::Single), "0").unwrap_err();
        assert!(err.user_message.contains("no option 0"));
        assert!(parse_selection(&prompt(SelectionMode::Multiple), "1,4").is_err());
    }
}
