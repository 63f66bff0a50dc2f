mod terminal;

use clap::{Parser, Subcommand, ValueEnum};
use component_dropdown::{describe, parameter_schema, render_json};
use dropdown_spec::{
    Answer, Clock, DisplaySurface, MemorySurface, RenderConfig, ResponseError, ResponseRecord,
    SystemClock, Trial, TrialSpec, build_form, render_html, render_text,
};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use terminal::{PromptContext, TrialPresenter, Verbosity, parse_selection};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "DROPDOWN_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Terminal host for dropdown survey trials",
    long_about = "Renders dropdown trials, runs them interactively or from recorded answers, and prints the response record"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Html,
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plugin name and parameter declarations.
    Describe,
    /// Print the JSON Schema of the trial parameters.
    Schema,
    /// Render a trial without running it.
    Render {
        /// Path to the trial specification JSON.
        #[arg(long, value_name = "TRIAL")]
        trial: PathBuf,
        /// Optional render configuration JSON.
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = RenderMode::Html)]
        format: RenderMode,
    },
    /// Run a trial and print the response record.
    Run {
        /// Path to the trial specification JSON.
        #[arg(long, value_name = "TRIAL")]
        trial: PathBuf,
        /// Optional render configuration JSON.
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
        /// JSON array with one answer per question; skips the interactive prompts.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Show the form summary and rejected submits.
        #[arg(long)]
        verbose: bool,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Describe => print_component_result(&describe()),
        Command::Schema => print_component_result(&parameter_schema()),
        Command::Render {
            trial,
            config,
            format,
        } => run_render(&trial, config.as_deref(), format),
        Command::Run {
            trial,
            config,
            answers,
            verbose,
        } => run_trial(&trial, config.as_deref(), answers.as_deref(), verbose),
    }
}

fn parse_component_result(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        Err(error.into())
    } else {
        Ok(value)
    }
}

fn print_component_result(response: &str) -> CliResult<()> {
    let value = parse_component_result(response)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn read_config_json(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => Ok(String::new()),
    }
}

fn mount_preview(trial_json: &str, config_json: &str) -> CliResult<MemorySurface> {
    let spec = TrialSpec::from_json(trial_json)?.normalize()?;
    let config = RenderConfig::from_json(config_json)?;
    let mut surface = MemorySurface::new();
    surface.mount(build_form(&spec, &config));
    Ok(surface)
}

fn run_render(trial_path: &Path, config_path: Option<&Path>, format: RenderMode) -> CliResult<()> {
    let trial_json = fs::read_to_string(trial_path)?;
    let config_json = read_config_json(config_path)?;
    match format {
        RenderMode::Html => {
            let surface = mount_preview(&trial_json, &config_json)?;
            println!("{}", render_html(&surface)?);
            Ok(())
        }
        RenderMode::Json => print_component_result(&render_json(&trial_json, &config_json)),
        RenderMode::Text => {
            let surface = mount_preview(&trial_json, &config_json)?;
            println!("{}", render_text(&surface));
            Ok(())
        }
    }
}

fn load_answers(path: &Path) -> CliResult<Vec<Option<Answer>>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn run_trial(
    trial_path: &Path,
    config_path: Option<&Path>,
    answers_path: Option<&Path>,
    verbose: bool,
) -> CliResult<()> {
    let spec = TrialSpec::from_json(&fs::read_to_string(trial_path)?)?;
    let config = RenderConfig::from_json(&read_config_json(config_path)?)?;
    let recorded = answers_path.map(load_answers).transpose()?;
    let presenter = TrialPresenter::new(Verbosity::from_verbose(verbose));

    let mut surface = MemorySurface::new();
    let mut record = None;
    {
        let mut trial = Trial::start(
            spec,
            &config,
            &mut surface,
            SystemClock::new(),
            |finished: ResponseRecord| record = Some(finished),
        )?;
        presenter.show_form(&render_text(&surface));

        match recorded {
            Some(answers) => {
                for (index, answer) in answers.iter().enumerate() {
                    if let Some(answer) = answer {
                        trial.set_answer(index, answer)?;
                    }
                }
                trial.submit(&mut surface)?;
            }
            None => {
                let mut pending: Vec<usize> = (0..trial.spec().question_count()).collect();
                loop {
                    for index in pending {
                        let answer = prompt_question(&trial, index, &presenter)?;
                        trial.set_answer(index, &answer)?;
                    }
                    match trial.submit(&mut surface) {
                        Ok(()) => break,
                        Err(ResponseError::MissingRequired(missing)) => {
                            presenter.show_missing(&missing);
                            pending = missing;
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
        }
    }

    let record = record.ok_or("trial finished without a response record")?;
    presenter.show_completion(&record)?;
    Ok(())
}

fn prompt_question<C, F>(
    trial: &Trial<C, F>,
    index: usize,
    presenter: &TrialPresenter,
) -> CliResult<Answer>
where
    C: Clock,
    F: FnOnce(ResponseRecord),
{
    let spec = trial.spec();
    let widget = trial
        .widget(index)
        .ok_or_else(|| format!("question {} has no widget", index))?;
    let prompt = PromptContext::new(
        index,
        spec.question_count(),
        &spec.questions[index],
        spec.is_required(index),
        widget,
    );

    loop {
        presenter.show_prompt(&prompt);
        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err("input closed before the trial was submitted".into());
        }

        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("exit") {
            return Err("trial aborted by participant".into());
        }

        match parse_selection(&prompt, trimmed) {
            Ok(answer) => return Ok(answer),
            Err(err) => presenter.show_parse_error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use serde_json::Value;

    const COLOR_FRUIT: &str = include_str!("../../dropdown-spec/tests/fixtures/color_fruit.json");

    fn record_from(stdout: &[u8]) -> Value {
        serde_json::from_slice(stdout).expect("record json")
    }

    fn responses(record: &Value) -> Value {
        serde_json::from_str(record["responses"].as_str().expect("responses")).expect("json")
    }

    #[test]
    fn describe_prints_plugin_info() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("dropdown-trial")?
            .arg("describe")
            .output()?;
        assert!(output.status.success());
        let info: Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(info["name"], "dropdown");
        Ok(())
    }

    #[test]
    fn run_replays_recorded_answers() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let trial = workspace.child("trial.json");
        trial.write_str(COLOR_FRUIT)?;
        let answers = workspace.child("answers.json");
        answers.write_str(r#"["Blue", ["Apple", "Cherry"]]"#)?;

        let output = Command::cargo_bin("dropdown-trial")?
            .arg("run")
            .arg("--trial")
            .arg(trial.path())
            .arg("--answers")
            .arg(answers.path())
            .output()?;
        assert!(output.status.success());
        let record = record_from(&output.stdout);
        assert_eq!(record["preamble"], "<p>Tell us about your preferences.</p>");
        let responses = responses(&record);
        assert_eq!(responses["A0"], "Blue");
        assert_eq!(responses["A1"][1], "Cherry");
        Ok(())
    }

    #[test]
    fn run_prompts_until_required_answer_given() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let trial = dir.path().join("trial.json");
        std::fs::write(&trial, COLOR_FRUIT)?;

        let assert = Command::cargo_bin("dropdown-trial")?
            .arg("run")
            .arg("--trial")
            .arg(&trial)
            .write_stdin("\n3,1\n2\n")
            .assert()
            .success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
        assert!(stdout.contains("Please answer the required questions: 1"));
        let json_start = stdout.find("{\n").expect("record in output");
        let record: Value = serde_json::from_str(&stdout[json_start..])?;
        let responses = responses(&record);
        assert_eq!(responses["A0"], "Blue");
        assert_eq!(responses["A1"][0], "Cherry");
        assert_eq!(responses["A1"][1], "Apple");
        Ok(())
    }

    #[test]
    fn render_reports_mismatched_options() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let trial = workspace.child("trial.json");
        trial.write_str(r#"{"questions": ["a", "b"], "options": [["x"]]}"#)?;

        Command::cargo_bin("dropdown-trial")?
            .arg("render")
            .arg("--trial")
            .arg(trial.path())
            .assert()
            .failure();
        Ok(())
    }

    #[test]
    fn render_html_prints_form() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let trial = workspace.child("trial.json");
        trial.write_str(COLOR_FRUIT)?;

        let output = Command::cargo_bin("dropdown-trial")?
            .args(["render", "--trial"])
            .arg(trial.path())
            .output()?;
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.starts_with(r#"<form id="jspsych-dropdown-form">"#));
        assert!(stdout.contains(
            r#"<option selected disabled value="">Please choose an answer</option>"#
        ));
        Ok(())
    }

    #[test]
    fn render_text_lists_questions() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let trial = workspace.child("trial.json");
        trial.write_str(COLOR_FRUIT)?;

        let output = Command::cargo_bin("dropdown-trial")?
            .args(["render", "--format", "text", "--trial"])
            .arg(trial.path())
            .output()?;
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.contains("1. Favorite color? *"));
        assert!(stdout.contains("2. Pick fruits (select any)"));
        Ok(())
    }
}
