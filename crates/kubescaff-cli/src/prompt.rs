//! Yes/no questions on the terminal.

use std::io::{self, BufRead, Write};

use kubescaff_core::application::{ApplicationError, Prompter};
use kubescaff_core::error::KsResult;

/// [`Prompter`] backed by the process's stdin and stderr.
///
/// Uses `dialoguer` when built with the `interactive` feature and both ends
/// are terminals; otherwise reads whole lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str, default: bool) -> KsResult<bool> {
        #[cfg(feature = "interactive")]
        if io::IsTerminal::is_terminal(&io::stdin()) && io::IsTerminal::is_terminal(&io::stderr()) {
            return dialoguer::Confirm::new()
                .with_prompt(question)
                .default(default)
                .interact()
                .map_err(|e| prompt_failed(e.to_string()));
        }

        let stdin = io::stdin();
        read_answer(question, default, &mut stdin.lock(), &mut io::stderr())
    }
}

/// Asks until the answer is `y`, `yes`, `n` or `no`. An empty line or end of
/// input takes `default`.
fn read_answer(
    question: &str,
    default: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> KsResult<bool> {
    loop {
        write!(out, "{question} ")
            .and_then(|()| out.flush())
            .map_err(|e| prompt_failed(e.to_string()))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| prompt_failed(e.to_string()))?;
        if read == 0 {
            return Ok(default);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(out, "invalid input, please type 'y' or 'n'")
                .map_err(|e| prompt_failed(e.to_string()))?,
        }
    }
}

fn prompt_failed(reason: String) -> kubescaff_core::error::KubescaffError {
    ApplicationError::PromptFailed { reason }.into()
}
