//! Parses one line of user input into a terminal command.

use std::path::{Path, PathBuf};

use shared::domain::FileId;

pub const HELP_TEXT: &str = "\
Commands:
  add <path>...          offer PDF files (quote paths that contain spaces)
  remove <id>            drop a pending file by its id
  remove-named <name>    drop every pending file with that name
  list                   show the current screen
  submit                 send the pending files for analysis
  adjust <instructions>  ask for a revised draft
  show                   print the current draft
  html [path]            print the draft as HTML, or save it to <path>
  copy                   copy the draft to the clipboard
  export [path]          save the draft as plain text
  new                    discard the draft and start a new analysis
  status                 check whether the backend is online
  help                   show this help
  quit                   leave the client";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Add(Vec<PathBuf>),
    Remove(FileId),
    RemoveNamed(String),
    List,
    Submit,
    Adjust(String),
    Show,
    Html(Option<PathBuf>),
    Copy,
    Export(Option<PathBuf>),
    New,
    Status,
    Help,
    Quit,
}

/// Shell-style words, so quoted or backslash-escaped paths may hold spaces.
/// An unquoted remainder naming an existing file is taken whole.
fn split_paths(rest: &str) -> Result<Vec<PathBuf>, String> {
    if !rest.contains(['"', '\'', '\\']) && Path::new(rest).is_file() {
        return Ok(vec![PathBuf::from(rest)]);
    }
    match shlex::split(rest) {
        Some(words) if !words.is_empty() => Ok(words.into_iter().map(PathBuf::from).collect()),
        _ => Err("usage: add <path>... (quote paths that contain spaces)".to_string()),
    }
}

/// `Ok(None)` for a blank line; `Err` carries a usage message.
pub fn parse_command(line: &str) -> Result<Option<UserCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let optional_path = || (!rest.is_empty()).then(|| PathBuf::from(rest));

    let cmd = match word.to_ascii_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                return Err("usage: add <path>...".to_string());
            }
            UserCommand::Add(split_paths(rest)?)
        }
        "remove" | "rm" => {
            let id = rest
                .parse::<u64>()
                .map_err(|_| "usage: remove <id>".to_string())?;
            UserCommand::Remove(FileId(id))
        }
        "remove-named" => {
            if rest.is_empty() {
                return Err("usage: remove-named <name>".to_string());
            }
            UserCommand::RemoveNamed(rest.to_string())
        }
        "list" | "ls" => UserCommand::List,
        "submit" => UserCommand::Submit,
        // Blank instructions are rejected by the session, not here.
        "adjust" => UserCommand::Adjust(rest.to_string()),
        "show" => UserCommand::Show,
        "html" => UserCommand::Html(optional_path()),
        "copy" => UserCommand::Copy,
        "export" => UserCommand::Export(optional_path()),
        "new" => UserCommand::New,
        "status" => UserCommand::Status,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" | "q" => UserCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(cmd))
}
