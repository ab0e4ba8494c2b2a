//! Operator confirmation.
//!
//! Every decision in an archive run goes through the [`Confirm`] trait, so
//! the workflow can be driven from a terminal in production and from a
//! scripted answer list in tests.

use std::io::{self, BufRead, Write};

/// Asks the operator a yes/no question.
///
/// Implementations block until an answer is available.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, question: &str) -> bool {
        (**self).confirm(question)
    }
}

/// Answer assumed when the operator just presses Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAnswer {
    Yes,
    No,
    /// An explicit answer is required
    None,
}

impl DefaultAnswer {
    fn hint(self) -> &'static str {
        match self {
            Self::Yes => " [Y/n] ",
            Self::No => " [y/N] ",
            Self::None => " [y/n] ",
        }
    }

    fn value(self) -> Option<bool> {
        match self {
            Self::Yes => Some(true),
            Self::No => Some(false),
            Self::None => None,
        }
    }
}

/// Interprets a typed reply. `None` means the reply was not understood.
pub fn parse_answer(reply: &str) -> Option<bool> {
    match reply.trim().to_lowercase().as_str() {
        "y" | "ye" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Prompts on a writer and reads replies line by line from a reader.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    default: DefaultAnswer,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout, reading from stdin.
    pub fn stdio(default: DefaultAnswer) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), default)
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W, default: DefaultAnswer) -> Self {
        Self {
            input,
            output,
            default,
        }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        loop {
            let _ = write!(self.output, "{}{}", question, self.default.hint());
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    // Input closed: never treat that as consent
                    tracing::warn!(target: "album_archiver::prompt", question, "No input available, answering no");
                    return false;
                }
                Ok(_) => {}
            }

            if line.trim().is_empty()
                && let Some(answer) = self.default.value()
            {
                return answer;
            }
            if let Some(answer) = parse_answer(&line) {
                return answer;
            }
            let _ = writeln!(self.output, "Please respond with 'yes' or 'no' (or 'y' or 'n').");
        }
    }
}
