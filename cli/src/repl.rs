//! Line-oriented form: each input line is one user action.

use std::io::{BufRead, Write};
use std::str::FromStr;

use fx_core::{ConversionController, Transport};
use thiserror::Error;

use crate::view::{display_text, form_text, options_text};

const HELP: &str = "\
commands:
  from <CODE>     choose the source currency (empty to clear)
  to <CODE>       choose the target currency (empty to clear)
  amount <VALUE>  set the amount
  convert         convert with the current fields
  swap            exchange source and target
  list            show available currencies
  reload          fetch the currency list again
  show            show the form and the last output
  help            this text
  quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    From(String),
    To(String),
    Amount(String),
    Convert,
    Swap,
    List,
    Reload,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("empty input")]
    Empty,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "from" => Ok(Command::From(rest.to_ascii_uppercase())),
            "to" => Ok(Command::To(rest.to_ascii_uppercase())),
            "amount" => Ok(Command::Amount(rest.to_string())),
            "convert" | "c" => Ok(Command::Convert),
            "swap" | "s" => Ok(Command::Swap),
            "list" | "ls" => Ok(Command::List),
            "reload" => Ok(Command::Reload),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Apply one command; returns the text to print, or `None` to stop.
pub fn apply<T: Transport>(controller: &mut ConversionController, transport: &T, command: Command) -> Option<String> {
    let text = match command {
        Command::From(code) => match controller.select_from(&code) {
            Ok(()) => form_text(controller),
            Err(e) => format!("error: {e}"),
        },
        Command::To(code) => match controller.select_to(&code) {
            Ok(()) => form_text(controller),
            Err(e) => format!("error: {e}"),
        },
        Command::Amount(value) => {
            controller.set_amount(value);
            form_text(controller)
        }
        Command::Convert => {
            if !controller.submit_enabled() {
                return Some(format!("{}\nnot ready: choose both currencies and a positive amount", form_text(controller)));
            }
            controller.submit(transport);
            display_text(controller.display())
        }
        Command::Swap => {
            controller.swap(transport);
            format!("{}\n{}", form_text(controller), display_text(controller.display()))
        }
        Command::List => options_text(&controller.from_options()),
        Command::Reload => {
            controller.load_catalog(transport);
            format!("{}\n{}", form_text(controller), display_text(controller.display()))
        }
        Command::Show => format!("{}\n{}", form_text(controller), display_text(controller.display())),
        Command::Help => HELP.to_string(),
        Command::Quit => return None,
    };
    Some(text.trim_end().to_string())
}

/// Read commands from `input` until EOF or `quit`.
pub fn run<T: Transport, R: BufRead, W: Write>(
    controller: &mut ConversionController,
    transport: &T,
    input: R,
    mut output: W,
) -> std::io::Result<()> {
    writeln!(output, "{}", form_text(controller))?;
    let shown = display_text(controller.display());
    if !shown.is_empty() {
        writeln!(output, "{shown}")?;
    }
    for line in input.lines() {
        let line = line?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };
        match apply(controller, transport, command) {
            Some(text) => writeln!(output, "{text}")?,
            None => break,
        }
    }
    Ok(())
}
