// Interactive chat loop

use anyhow::Result;
use crossterm::style::Stylize;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, error, warn};

use super::commands::{format_help, Command};
use crate::conversation::ConversationTracker;
use crate::storage::{Rating, SaveMode, TranscriptStore};

pub struct Repl {
    tracker: ConversationTracker,
    store: Option<Box<dyn TranscriptStore>>,
    save_mode: SaveMode,
    // UI state
    styled: bool,
}

impl Repl {
    /// `store` is `None` when saving is disabled
    pub fn new(
        tracker: ConversationTracker,
        store: Option<Box<dyn TranscriptStore>>,
        save_mode: SaveMode,
    ) -> Self {
        Self {
            tracker,
            store,
            save_mode,
            styled: io::stdout().is_terminal(),
        }
    }

    /// Turn ANSI styling of speaker labels on or off
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn tracker(&self) -> &ConversationTracker {
        &self.tracker
    }

    /// Run against the process's stdin/stdout
    pub async fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.run_with(&mut input, &mut output).await
    }

    /// Run the loop until a quit command or end of input
    pub async fn run_with<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(
            output,
            "Welcome to tunechat! Chatting with {} ({}).",
            self.tracker.generator().name(),
            self.tracker.generator().model()
        )?;
        writeln!(output, "{}", format_help())?;

        loop {
            write!(output, "\n{} ", self.label("You:"))?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // End of input: nothing left to read a rating from
                writeln!(output, "\nGoodbye!")?;
                break;
            }

            match Command::parse(&line) {
                Command::Quit => {
                    self.offer_save(input, output)?;
                    writeln!(output, "Goodbye!")?;
                    break;
                }
                Command::New => {
                    self.tracker.reset();
                    writeln!(output, "\nStarted a new chat!")?;
                }
                Command::Empty => {
                    writeln!(output, "Please enter a valid message!")?;
                }
                Command::Message(message) => match self.tracker.send(message).await {
                    Ok(reply) => {
                        let label = format!("{}:", self.tracker.generator().name());
                        writeln!(output, "\n{} {}", self.label(&label), reply)?;
                    }
                    Err(e) => {
                        error!("Gateway call failed: {}", e);
                        writeln!(output, "\nError: {}", e)?;
                    }
                },
            }
        }

        Ok(())
    }

    /// Ask for a rating and save the session. Save failures are reported, not
    /// returned; only console I/O errors propagate.
    fn offer_save<R, W>(&self, input: &mut R, output: &mut W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let Some(store) = self.store.as_deref() else {
            return Ok(());
        };
        if self.tracker.is_empty() {
            return Ok(());
        }

        debug!(
            "Offering to save session ({} complete exchanges)",
            self.tracker.turn_count()
        );

        let Some(rating) = prompt_rating(input, output)? else {
            writeln!(output, "Conversation not saved.")?;
            return Ok(());
        };

        let result = match self.save_mode {
            SaveMode::Condensed => store.save_conversation(
                self.tracker.first_user_message(),
                self.tracker.last_assistant_message(),
                rating,
            ),
            SaveMode::Full => store.save_full_conversation(self.tracker.history(), rating),
        };

        match result {
            Ok(()) => writeln!(
                output,
                "Conversation saved to {} with rating {}/5",
                store.path().display(),
                rating
            ),
            Err(e) => {
                if e.is_write_failure() {
                    error!("Failed to save conversation: {}", e);
                } else {
                    warn!("Conversation rejected by store: {}", e);
                }
                writeln!(output, "Error saving conversation: {}", e)
            }
        }
    }

    fn label(&self, text: &str) -> String {
        if self.styled {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Prompt until the user enters a rating between 1 and 5.
///
/// Returns `None` on an empty answer or end of input.
pub fn prompt_rating<R, W>(input: &mut R, output: &mut W) -> io::Result<Option<i32>>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(
            output,
            "\nRate this conversation from {} to {} (press Enter to skip): ",
            Rating::MIN,
            Rating::MAX
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        match answer.parse::<i32>() {
            Ok(value) if Rating::new(value).is_ok() => return Ok(Some(value)),
            _ => {
                warn!("Rejected rating input {:?}", answer);
                writeln!(
                    output,
                    "Please enter a number between {} and {}.",
                    Rating::MIN,
                    Rating::MAX
                )?;
            }
        }
    }
}
