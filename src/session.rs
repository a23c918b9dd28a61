//! The interactive read-eval-print loop.
//!
//! Generic over its input and output streams so tests can drive a full
//! session from a scripted byte buffer. Per-turn pipeline failures become a
//! single user-facing line and the loop keeps going; only startup failures
//! (handled before a [`Session`] exists) abort the process.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::warn;

use crate::pipeline::{Curator, Recommendation};
use crate::reasoning::ReasoningProvider;

const PROMPT: &str = "\n> How are you feeling today? ";
const SEPARATOR: &str = "-------------------------";

pub struct Session<R: ReasoningProvider> {
    curator: Curator<R>,
    exit_keyword: String,
    /// Artwork ids already shown this run, excluded from later queries so
    /// consecutive turns do not repeat themselves.
    shown: Vec<String>,
}

impl<R: ReasoningProvider> Session<R> {
    pub fn new(curator: Curator<R>, exit_keyword: impl Into<String>) -> Self {
        Self {
            curator,
            exit_keyword: exit_keyword.into(),
            shown: Vec::new(),
        }
    }

    /// Run the loop until the exit keyword or end of input.
    pub async fn run(&mut self, mut input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "\n--- Curio ---")?;
        writeln!(
            output,
            "Describe how you are feeling to receive an artwork. Type '{}' to quit.",
            self.exit_keyword
        )?;

        let mut line = String::new();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            line.clear();
            let bytes = input.read_line(&mut line).context("failed to read input")?;
            if bytes == 0 {
                // EOF — treat like exit
                break;
            }

            let mood = line.trim();
            if mood.eq_ignore_ascii_case(&self.exit_keyword) {
                break;
            }

            match self.curator.recommend(mood, &self.shown).await {
                Ok(recommendation) => {
                    self.shown.push(recommendation.artwork.id.clone());
                    write_recommendation(&mut output, &recommendation)?;
                }
                Err(e) => {
                    warn!(error = %e, "recommendation failed");
                    writeln!(output, "{}", e.user_message())?;
                }
            }
        }

        writeln!(output, "\nThank you for visiting. See you soon!")?;
        output.flush()?;
        Ok(())
    }
}

/// Print the formatted artwork block: quoted title with year, artist line,
/// movement line, blank line, explanation paragraph, separator.
fn write_recommendation(mut output: impl Write, rec: &Recommendation) -> Result<()> {
    writeln!(output, "\n--- Recommended Artwork ---")?;
    writeln!(output, "{}", rec.artwork.display_title())?;
    writeln!(output, "by {}", rec.artwork.artist)?;
    writeln!(output, "Movement: {}", rec.artwork.movement)?;
    writeln!(output)?;
    writeln!(output, "{}", rec.explanation)?;
    writeln!(output, "{SEPARATOR}")?;
    Ok(())
}
