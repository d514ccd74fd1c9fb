use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use reader_core::{Msg, QueuedFile};
use reader_logging::reader_debug;

use super::app::AppEvent;

pub const HELP: &str = "\
Commands:
  queue <file>...   replace the queue with these files
  add <file>...     append files to the queue
  clear             empty the queue
  toggle [on|off]   flip or set the only-Aztec filter
  upload            submit the queued files
  copy <n>          copy the text of result row n
  save <path>       write all results (.json or CSV)
  help              show this text
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Queue(Vec<PathBuf>),
    Add(Vec<PathBuf>),
    Clear,
    Toggle(Option<bool>),
    Upload,
    Copy(usize),
    Save(PathBuf),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Command::Empty;
    };
    let args: Vec<&str> = words.collect();

    match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("queue", files) if !files.is_empty() => {
            Command::Queue(files.iter().map(PathBuf::from).collect())
        }
        ("add", files) if !files.is_empty() => {
            Command::Add(files.iter().map(PathBuf::from).collect())
        }
        ("clear", []) => Command::Clear,
        ("toggle", []) => Command::Toggle(None),
        ("toggle", ["on"]) => Command::Toggle(Some(true)),
        ("toggle", ["off"]) => Command::Toggle(Some(false)),
        ("upload", []) => Command::Upload,
        ("copy", [n]) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Copy(n),
            _ => Command::Invalid(format!("not a row number: {n}")),
        },
        ("save", [path]) => Command::Save(PathBuf::from(path)),
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => Command::Invalid(line.trim().to_string()),
    }
}

impl Command {
    /// Message for the state machine; `toggle` needs the current flag to flip.
    pub fn into_msg(self, only_aztec: bool) -> Option<Msg> {
        match self {
            Command::Queue(paths) => Some(Msg::FilesQueued(queued(paths))),
            Command::Add(paths) => Some(Msg::FilesAdded(queued(paths))),
            Command::Clear => Some(Msg::QueueCleared),
            Command::Toggle(value) => Some(Msg::OnlyAztecToggled(value.unwrap_or(!only_aztec))),
            Command::Upload => Some(Msg::UploadClicked),
            Command::Copy(n) => Some(Msg::CopyRequested { row: n - 1 }),
            Command::Save(path) => Some(Msg::ExportRequested { path }),
            Command::Help => Some(Msg::HelpRequested),
            Command::Invalid(input) => Some(Msg::CommandRejected { input }),
            Command::Quit | Command::Empty => None,
        }
    }
}

fn queued(paths: Vec<PathBuf>) -> Vec<QueuedFile> {
    paths.into_iter().map(QueuedFile::from_path).collect()
}

/// Reads commands from stdin until EOF or `quit`.
pub fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let command = parse_command(&line);
            reader_debug!("Input command {:?}", command);
            let event = match command {
                Command::Empty => continue,
                Command::Quit => AppEvent::Quit,
                other => AppEvent::Command(other),
            };
            let quit = matches!(event, AppEvent::Quit);
            if tx.send(event).is_err() || quit {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_queue_commands() {
        assert_eq!(
            parse_command("add a.pdf  b.pdf"),
            Command::Add(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
        );
        assert_eq!(
            parse_command("QUEUE x.pdf"),
            Command::Queue(vec![PathBuf::from("x.pdf")])
        );
        assert_eq!(parse_command("clear"), Command::Clear);
        assert!(matches!(parse_command("add"), Command::Invalid(_)));
    }

    #[test]
    fn toggle_flips_or_sets() {
        assert_eq!(
            parse_command("toggle").into_msg(true),
            Some(Msg::OnlyAztecToggled(false))
        );
        assert_eq!(
            parse_command("toggle on").into_msg(true),
            Some(Msg::OnlyAztecToggled(true))
        );
    }

    #[test]
    fn copy_rows_are_one_based() {
        assert_eq!(
            parse_command("copy 3").into_msg(false),
            Some(Msg::CopyRequested { row: 2 })
        );
        assert!(matches!(parse_command("copy 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("copy x"), Command::Invalid(_)));
    }

    #[test]
    fn blank_and_control_lines() {
        assert_eq!(parse_command("   "), Command::Empty);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("help").into_msg(false), Some(Msg::HelpRequested));
        assert_eq!(
            parse_command("frob 1").into_msg(false),
            Some(Msg::CommandRejected {
                input: "frob 1".to_string()
            })
        );
        assert_eq!(parse_command("upload").into_msg(false), Some(Msg::UploadClicked));
        assert_eq!(
            parse_command("save out.json").into_msg(false),
            Some(Msg::ExportRequested {
                path: PathBuf::from("out.json")
            })
        );
    }
}
