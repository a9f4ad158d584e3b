// Command parsing for the chat loop

/// One line of user input, classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Discard the session and start over
    New,
    /// Leave the chat (offering to save first)
    Quit,
    /// Blank line
    Empty,
    /// Anything else is sent to the model
    Message(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(input: &'a str) -> Self {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Command::Quit,
            "new" => Command::New,
            "" => Command::Empty,
            _ => Command::Message(input),
        }
    }
}

pub fn format_help() -> String {
    "Commands:\n  \
       new              - Start a new chat\n  \
       quit, exit, q    - Leave (you can rate and save the chat first)\n\n\
     Anything else is sent as a message."
        .to_string()
}
