//! Terminal adapter: turns typed commands into actions and answers
//! confirmation prompts on the same input stream.

use crate::actions::AppAction;
use crate::state::AppState;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tripsync_core::catalog;
use tripsync_core::environment::Confirmer;

/// Errors in typed commands. Shown to the user; never reach the reducer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// First word is not a command
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    /// Wrong arguments
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// Train not in the catalog
    #[error("Unknown train '{0}'. Type 'trains' to see the options.")]
    UnknownTrain(String),

    /// Station not in the catalog
    #[error("Unknown station '{0}'. Type 'stations' to see the options.")]
    UnknownStation(String),

    /// Position outside the ticket list
    #[error("There is no ticket {0}. Type 'refresh' to reload your tickets.")]
    NoSuchTicket(String),
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Send this action to the store
    Dispatch(AppAction),
    /// Print the train catalog
    Trains,
    /// Print the station list
    Stations,
    /// Print the command reference
    Help,
    /// Leave the client
    Quit,
}

/// Parses one non-blank input line against the current state.
///
/// The state resolves list positions (`edit 2`) to tickets.
///
/// # Errors
///
/// Returns a [`CommandError`] describing what is wrong with the line.
pub fn parse_command(line: &str, state: &AppState) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let action = match word.to_ascii_lowercase().as_str() {
        "register" => match args.as_slice() {
            [username, password] => AppAction::register(username, None, password),
            [username, password, email] => AppAction::register(username, Some(*email), password),
            _ => return Err(CommandError::Usage("register <username> <password> [email]")),
        },
        "login" => match args.as_slice() {
            [username, password] => AppAction::login(username, password),
            _ => return Err(CommandError::Usage("login <username> <password>")),
        },
        "logout" => AppAction::Logout,
        "show" => match rest.to_ascii_lowercase().as_str() {
            "register" => AppAction::ShowRegister,
            "login" => AppAction::ShowLogin,
            "dashboard" => AppAction::ShowDashboard,
            _ => return Err(CommandError::Usage("show register|login|dashboard")),
        },
        "train" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("train <name>|none"));
            }
            if rest.eq_ignore_ascii_case("none") {
                AppAction::SelectTrain { train: None }
            } else {
                AppAction::select_train(resolve_train(rest)?)
            }
        },
        "from" => AppAction::select_source(resolve_station(rest, "from <station>")?),
        "to" => AppAction::select_destination(resolve_station(rest, "to <station>")?),
        "save" => AppAction::SaveTicket,
        "edit" => AppAction::EditTicket {
            ticket: ticket_at(state, rest, "edit <n>")?.clone(),
        },
        "cancel" => AppAction::DeleteTicket {
            ticket_id: ticket_at(state, rest, "cancel <n>")?.id.clone(),
        },
        "reset" => AppAction::ResetForm,
        "refresh" => AppAction::LoadTickets,
        "trains" => return Ok(Command::Trains),
        "stations" => return Ok(Command::Stations),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Command::Dispatch(action))
}

/// Accepts a catalog name (any case) or a position from `trains`.
fn resolve_train(input: &str) -> Result<&'static str, CommandError> {
    let by_position = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| catalog::trains().get(i))
        .map(|train| train.name);

    by_position
        .or_else(|| catalog::resolve_train(input))
        .ok_or_else(|| CommandError::UnknownTrain(input.to_string()))
}

/// Accepts a station name (any case) or a position from `stations`.
fn resolve_station(input: &str, usage: &'static str) -> Result<&'static str, CommandError> {
    if input.is_empty() {
        return Err(CommandError::Usage(usage));
    }

    let by_position = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| catalog::stations().get(i).copied());

    by_position
        .or_else(|| catalog::resolve_station(input))
        .ok_or_else(|| CommandError::UnknownStation(input.to_string()))
}

fn ticket_at<'a>(
    state: &'a AppState,
    input: &str,
    usage: &'static str,
) -> Result<&'a tripsync_core::ticket::Ticket, CommandError> {
    let position = input.parse::<usize>().map_err(|_| CommandError::Usage(usage))?;
    state
        .ticket_at(position)
        .ok_or_else(|| CommandError::NoSuchTicket(input.to_string()))
}

/// Lines typed by the user, shared by the command loop and the confirmer.
///
/// Only one reader holds the stream at a time; the command loop waits for an
/// action's effects (including any prompt) before reading the next command.
#[derive(Clone, Debug)]
pub struct LineSource {
    lines: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl LineSource {
    /// Reads stdin on a background task
    #[must_use]
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).await.is_err() {
                            break;
                        }
                    },
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read from stdin");
                        break;
                    },
                }
            }
            tracing::debug!("Input closed");
        });
        Self::from_receiver(rx)
    }

    /// A fixed script of lines, ending after the last one
    #[must_use]
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            // Capacity covers every line.
            let _ = tx.try_send(line);
        }
        Self::from_receiver(rx)
    }

    fn from_receiver(rx: mpsc::Receiver<String>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(rx)),
        }
    }

    /// Next line, or `None` once input is closed
    pub async fn next_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }
}

/// Asks `y/N` questions on the terminal.
///
/// Anything but `y`/`yes` (including closed input) declines.
#[derive(Clone, Debug)]
pub struct TerminalConfirmer {
    lines: LineSource,
}

impl TerminalConfirmer {
    /// Creates a confirmer reading answers from `lines`
    #[must_use]
    pub const fn new(lines: LineSource) -> Self {
        Self { lines }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send {
        let lines = self.lines.clone();
        let prompt = prompt.to_string();
        async move {
            print!("{prompt} [y/N] ");
            if let Err(e) = std::io::stdout().flush() {
                tracing::debug!(error = %e, "Failed to flush prompt");
            }
            let answer = lines.next_line().await;
            is_yes(answer.as_deref())
        }
    }
}

fn is_yes(answer: Option<&str>) -> bool {
    answer.is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
