use std::str::FromStr;

use thiserror::Error;

/// One line of user input. Rows are 1-based positions on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(usize),
    Delete(usize),
    Edit(usize),
    Draft(String),
    /// Saves the given text, or the current draft when `None`.
    Save(Option<String>),
    Cancel,
    Next,
    Prev,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("invalid row '{0}'")]
    BadRow(String),
}

pub const HELP: &str = "\
add <text>      create an item
toggle <row>    flip completion
delete <row>    delete an item
edit <row>      start editing an item
draft <text>    replace the edit draft
save [text]     save the draft, or the given text
cancel          stop editing
next / prev     change page
refresh         reload page and count
quit            exit";

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word {
            "" => Err(ParseError::Empty),
            "add" | "a" => Ok(Command::Add(rest.to_string())),
            "toggle" | "t" => row(rest, "toggle").map(Command::Toggle),
            "delete" | "rm" => row(rest, "delete").map(Command::Delete),
            "edit" | "e" => row(rest, "edit").map(Command::Edit),
            "draft" => Ok(Command::Draft(rest.to_string())),
            "save" | "s" => Ok(Command::Save((!rest.is_empty()).then(|| rest.to_string()))),
            "cancel" => Ok(Command::Cancel),
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Prev),
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn row(arg: &str, command: &'static str) -> Result<usize, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument(command, "a row number"));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::BadRow(arg.to_string())),
    }
}
