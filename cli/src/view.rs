//! Text rendering of the controller's display state.

use fx_core::{ConversionController, Display, SelectOption};

pub fn display_text(display: &Display) -> String {
    match display {
        Display::Empty => String::new(),
        Display::Loading(message) => message.clone(),
        Display::Error(message) => format!("error: {message}"),
        Display::Result(rendered) => {
            let mut lines = vec![
                format!("{} =", rendered.original_amount),
                rendered.converted_amount.clone(),
                rendered.unit_rate.clone(),
            ];
            lines.extend(rendered.as_of.clone());
            lines.join("\n")
        }
    }
}

pub fn options_text(options: &[SelectOption]) -> String {
    options
        .iter()
        .filter(|option| !option.value.is_empty())
        .map(|option| option.label.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary of the form fields and the submit gate.
pub fn form_text(controller: &ConversionController) -> String {
    let form = controller.form();
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    format!(
        "from: {}  to: {}  amount: {}  [{}]",
        or_dash(&form.from),
        or_dash(&form.to),
        or_dash(&form.amount),
        if controller.submit_enabled() { "ready" } else { "incomplete" }
    )
}
