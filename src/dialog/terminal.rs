use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ChoiceDialog, ChoiceRequest, DialogEvent, DialogSession, Selection};
use crate::error::{AppError, AppResult};
use crate::models::Field;

const CONTROLLING_TERMINAL: &str = "/dev/tty";

/// Where answers are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerInput {
    /// stdin is itself a terminal.
    Stdin,
    /// stdin carries something else (the page); ask on `/dev/tty`.
    ControllingTerminal,
    /// Nobody can answer. Dialogs fail rather than cancel.
    Unavailable,
}

impl AnswerInput {
    pub fn detect() -> Self {
        Self::choose(io::stdin().is_terminal(), controlling_terminal_available())
    }

    pub fn choose(stdin_is_terminal: bool, tty_available: bool) -> Self {
        match (stdin_is_terminal, tty_available) {
            (true, _) => AnswerInput::Stdin,
            (false, true) => AnswerInput::ControllingTerminal,
            (false, false) => AnswerInput::Unavailable,
        }
    }
}

fn controlling_terminal_available() -> bool {
    cfg!(unix) && File::open(CONTROLLING_TERMINAL).is_ok()
}

/// Interactive dialog on the terminal: the prompt goes to stderr, answers
/// are read line by line from stdin or, when stdin is piped, from the
/// controlling terminal. End of input only dismisses on a real terminal.
pub struct TerminalDialog {
    // Held for the whole lifetime of a prompt so two dialogs never interleave.
    open: Mutex<()>,
    input: AnswerInput,
}

impl Default for TerminalDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDialog {
    pub fn new() -> Self {
        Self::with_input(AnswerInput::detect())
    }

    pub fn with_input(input: AnswerInput) -> Self {
        Self {
            open: Mutex::new(()),
            input,
        }
    }

    pub fn input(&self) -> AnswerInput {
        self.input
    }
}

#[async_trait]
impl ChoiceDialog for TerminalDialog {
    async fn present_choice(&self, request: &ChoiceRequest) -> AppResult<Selection> {
        if self.input == AnswerInput::Unavailable {
            return Err(AppError::Dialog(format!(
                "no terminal to choose the {} on; pass --input or --accept-defaults",
                request.field.label()
            )));
        }

        let _open = self.open.lock().await;
        let mut session = DialogSession::open(request.clone());

        render_prompt(session.request(), &mut io::stderr().lock())?;

        loop {
            let line = read_line(self.input).await?;
            let events = parse_answer(line.as_deref(), session.request().options.len());
            if events.is_empty() {
                eprint!("Please answer with a number, Enter, 'c' or 'q': ");
                io::stderr().flush()?;
                continue;
            }
            for event in events {
                if let Some(selection) = session.apply(event) {
                    return Ok(selection);
                }
            }
        }
    }
}

fn heading(field: Field) -> &'static str {
    match field {
        Field::Url => "Choose the URL to copy",
        Field::Title => "Choose the title to use",
    }
}

/// Write the numbered option list; the preselected entry is starred.
pub(crate) fn render_prompt<W: Write>(request: &ChoiceRequest, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}:", heading(request.field))?;
    for (i, option) in request.options.iter().enumerate() {
        let marker = if i == request.preselected { '*' } else { ' ' };
        writeln!(
            out,
            " {marker}[{}] {}: {}",
            i + 1,
            printable(&option.source_label),
            printable(&option.value)
        )?;
    }
    write!(
        out,
        "Number to pick, Enter for [{}], 'c' to cancel, 'q' to dismiss: ",
        request.preselected + 1
    )?;
    out.flush()
}

/// Map one line of input (or `None` on end of input) to dialog events.
/// An empty result means the answer was not understood.
pub(crate) fn parse_answer(line: Option<&str>, option_count: usize) -> Vec<DialogEvent> {
    let Some(line) = line else {
        return vec![DialogEvent::Dismiss];
    };

    match line.trim().to_ascii_lowercase().as_str() {
        "" => vec![DialogEvent::Confirm],
        "c" | "cancel" => vec![DialogEvent::Cancel],
        "q" | "esc" | "escape" => vec![DialogEvent::Dismiss],
        other => match other.parse::<usize>() {
            Ok(n) if (1..=option_count).contains(&n) => {
                vec![DialogEvent::Select(n - 1), DialogEvent::Confirm]
            }
            _ => Vec::new(),
        },
    }
}

/// Page-supplied text must not be able to drive the terminal.
fn printable(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

async fn read_line(input: AnswerInput) -> AppResult<Option<String>> {
    let read = tokio::task::spawn_blocking(move || -> io::Result<Option<String>> {
        let mut buf = String::new();
        let n = match input {
            AnswerInput::Stdin => io::stdin().lock().read_line(&mut buf)?,
            AnswerInput::ControllingTerminal => {
                BufReader::new(File::open(CONTROLLING_TERMINAL)?).read_line(&mut buf)?
            }
            AnswerInput::Unavailable => {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no terminal"))
            }
        };
        Ok((n > 0).then_some(buf))
    })
    .await
    .map_err(|e| AppError::Dialog(format!("input task failed: {e}")))?;

    Ok(read?)
}
