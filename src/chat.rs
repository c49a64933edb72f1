//! Retrieval-augmented chat loop.
//!
//! One turn embeds the question, retrieves the top-K matching chunks,
//! renders the prompt, and streams the answer to the terminal. Errors are
//! reported and the loop keeps prompting; only `exit` (any letter case)
//! ends the session.

use std::io::Write;
use std::sync::Arc;

use futures::StreamExt;
use owo_colors::OwoColorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::document::QueryMatch;
use crate::embedding::EmbeddingProvider;
use crate::error::{DocChatError, Result};
use crate::llm::ChatModel;
use crate::vectorize::VectorIndex;

/// Width of the separator line printed between turns.
const SEPARATOR_WIDTH: usize = 50;

/// What to do with one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// End the session without touching the network.
    Exit,
    /// Answer the contained question.
    Ask(String),
}

/// Classify a line of input: an exact case-insensitive `exit` terminates,
/// anything else is a question.
pub fn classify(input: &str) -> Turn {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        Turn::Exit
    } else {
        Turn::Ask(trimmed.to_string())
    }
}

/// Join match texts with newlines, preserving the order returned by the
/// index.
pub fn build_context(matches: &[QueryMatch]) -> String {
    matches.iter().map(|m| m.metadata.text.as_str()).collect::<Vec<_>>().join("\n")
}

/// Render the fixed prompt: answer strictly from the supplied context.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        "I am going to give you the context and ask the question related to that context \
         you have to just frame the answer according to that context,\n\
         context : {context}\n\
         Question: {question}\n"
    )
}

/// An interactive retrieval-augmented chat session.
///
/// Holds the collaborators for one conversation; state is reset every turn
/// apart from the line-editor history.
pub struct ChatSession {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn ChatModel>,
    top_k: usize,
}

impl ChatSession {
    /// Create a new session.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn ChatModel>,
        top_k: usize,
    ) -> Self {
        Self { embedder, index, llm, top_k }
    }

    /// Embed the question, query the index, and assemble the context block.
    pub async fn retrieve_context(&self, question: &str) -> Result<String> {
        let vector = self.embedder.embed(question).await?;
        let matches = self.index.query_top_k(&vector, self.top_k).await?;
        debug!(match_count = matches.len(), "retrieved context");
        Ok(build_context(&matches))
    }

    /// Answer one question, streaming fragments to stdout as they arrive.
    pub async fn answer(&self, question: &str) -> Result<()> {
        let context = self.retrieve_context(question).await?;
        let prompt = render_prompt(&context, question);

        print!("{}", "Assistant: ".green());
        flush_stdout();

        let mut stream = self.llm.stream_answer(&prompt).await?;
        while let Some(fragment) = stream.next().await {
            print!("{}", fragment?);
            flush_stdout();
        }
        println!("\n");

        Ok(())
    }

    /// Run the interactive loop until the user exits.
    ///
    /// Per-turn failures are printed in red and the loop resumes; the only
    /// clean exits are the `exit` command and end-of-input.
    pub async fn run(&self) -> Result<()> {
        print_header();

        let mut editor = DefaultEditor::new()
            .map_err(|e| DocChatError::Config(format!("failed to start line editor: {e}")))?;

        loop {
            let line = match editor.readline(&format!("{}", "You: ".yellow())) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    warn!(error = %e, "line editor failed");
                    break;
                }
            };
            let _ = editor.add_history_entry(&line);

            let question = match classify(&line) {
                Turn::Exit => break,
                Turn::Ask(question) if question.is_empty() => continue,
                Turn::Ask(question) => question,
            };

            if let Err(e) = self.answer(&question).await {
                eprintln!("{}", format!("Error: {e}").red());
            }
            println!("{}", "─".repeat(SEPARATOR_WIDTH).dimmed());
        }

        println!("{}", "\nGoodbye!".dimmed());
        Ok(())
    }
}

fn print_header() {
    // Clear the screen and home the cursor.
    print!("\x1b[2J\x1b[1;1H");
    println!("{}", "╭──────────────────────────────────╮".cyan());
    println!("{}", "│        PDF Chat Assistant        │".cyan());
    println!("{}", "╰──────────────────────────────────╯".cyan());
    println!();
    println!("{}", "Type \"exit\" to quit".dimmed());
    println!();
}

fn flush_stdout() {
    let _ = std::io::stdout().flush();
}
