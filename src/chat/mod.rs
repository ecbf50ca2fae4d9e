
use std::io::{BufRead, Write};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::chain::RagChain;

/// Keywords that end the session, matched case-insensitively.
const EXIT_KEYWORDS: [&str; 3] = ["sair", "exit", "quit"];

/// What to do with one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Terminate the session.
    Exit,
    /// Ignore the line and prompt again.
    Skip,
    /// Forward the question to the chain.
    Ask(String),
}

/// Classify a raw input line. Surrounding whitespace is ignored both for
/// exit detection and for the forwarded question.
#[inline]
pub fn classify_input(line: &str) -> Action {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Action::Skip;
    }
    if EXIT_KEYWORDS
        .iter()
        .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
    {
        return Action::Exit;
    }
    Action::Ask(trimmed.to_string())
}

/// Anything that can answer a question. The retrieval chain implements
/// this; tests substitute their own sources.
#[async_trait]
pub trait AnswerSource {
    async fn answer(&self, question: &str) -> Result<String>;
}

#[async_trait]
impl AnswerSource for RagChain {
    async fn answer(&self, question: &str) -> Result<String> {
        self.invoke(question).await
    }
}

/// Blocking read-evaluate-print loop. Each question is processed
/// synchronously; an invocation error is reported inline and the loop
/// continues. Returns when the user asks to leave or input reaches end of
/// file.
#[inline]
pub async fn run_session<S, R, W>(source: &S, mut input: R, mut output: W) -> std::io::Result<()>
where
    S: AnswerSource + Sync,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "\nVocê: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            debug!("End of input, terminating session");
            writeln!(output, "\nEncerrando chat. Até logo!")?;
            return Ok(());
        }

        match classify_input(&line) {
            Action::Exit => {
                writeln!(output, "\nEncerrando chat. Até logo!")?;
                return Ok(());
            }
            Action::Skip => {}
            Action::Ask(question) => {
                writeln!(output, "Buscando resposta baseada no contexto...")?;
                match source.answer(&question).await {
                    Ok(response) => writeln!(output, "Assistente: {response}")?,
                    Err(e) => writeln!(
                        output,
                        "[ERRO] Ocorreu um problema ao processar sua pergunta: {e:#}"
                    )?,
                }
            }
        }
    }
}
