use handlebars::Handlebars;

pub use handlebars::RenderError;

use crate::form::Form;
use crate::surface::DisplaySurface;
use crate::widget::SelectionMode;

/// Author text (preamble, superq, prompts) may contain HTML and is emitted unescaped.
const FORM_TEMPLATE: &str = concat!(
    r#"<form id="{{id}}">"#,
    r#"<div id="{{preamble.id}}" class="{{preamble.class}}">{{{preamble.html}}}</div>"#,
    r#"{{#if superq}}<div id="{{superq.id}}" class="{{superq.class}}">{{{superq.html}}}</div>{{/if}}"#,
    r#"{{#each questions}}<div><p class="{{prompt_class}}">{{{prompt}}}</p>"#,
    r#"<select id="{{control.id}}" name="{{control.name}}"{{#if (eq control.mode "multiple")}} multiple{{/if}}{{#if control.required}} required{{/if}}>"#,
    r#"{{#if (eq control.mode "single")}}<option selected disabled value="">{{control.placeholder}}</option>{{/if}}"#,
    r#"</select></div>{{/each}}"#,
    r#"<input type="submit" id="{{submit.id}}" class="{{submit.class}}" value="{{submit.label}}"></input>"#,
    r#"</form>"#,
);

/// Renders every mounted form as HTML, in mount order. An empty surface renders as "".
pub fn render_html<S>(surface: &S) -> Result<String, RenderError>
where
    S: DisplaySurface + ?Sized,
{
    let registry = Handlebars::new();
    let mut html = String::new();
    for form in surface.forms() {
        html.push_str(&registry.render_template(FORM_TEMPLATE, form)?);
    }
    Ok(html)
}

/// Plain-text view of the mounted forms for terminal hosts.
pub fn render_text<S>(surface: &S) -> String
where
    S: DisplaySurface + ?Sized,
{
    surface
        .forms()
        .iter()
        .map(form_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn form_text(form: &Form) -> String {
    let mut lines = Vec::new();
    if !form.preamble.html.is_empty() {
        lines.push(form.preamble.html.clone());
    }
    if let Some(superq) = &form.superq {
        lines.push(superq.html.clone());
    }
    for question in &form.questions {
        let mut entry = format!("{}. {}", question.index + 1, question.prompt);
        if question.control.mode == SelectionMode::Multiple {
            entry.push_str(" (select any)");
        }
        if question.control.required {
            entry.push_str(" *");
        }
        lines.push(entry);
    }
    lines.push(format!("[{}]", form.submit.label));
    lines.join("\n")
}
