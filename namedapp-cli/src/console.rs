//! Interactive console over a [`NameDappController`].
//!
//! Each line is one command. Notices from the controller are printed as they
//! arrive, so a mutation running in the background reports its outcome
//! without blocking the prompt.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Arc;

use namedapp::contract::explorer_url;
use namedapp::controller::{Action, NameDappController, Notice, NoticeLevel};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

const PROMPT: &str = "namedapp> ";

const HELP: &str = "\
Commands:
  connect          connect the wallet
  names            get all names
  name [index]     get the name at an index
  add [name]       add a name
  remove [index]   remove the name at an index
  status           show the current view
  help             show this help
  exit             quit";

/// One console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect the wallet.
    Connect,
    /// Fetch and show every name.
    Names,
    /// Fetch one name; the argument replaces the index input.
    Name(Option<String>),
    /// Add a name; the argument replaces the name input.
    Add(Option<String>),
    /// Remove a name; the argument replaces the index input.
    Remove(Option<String>),
    /// Render the view state.
    Status,
    /// Show the command list.
    Help,
    /// Leave the console.
    Exit,
    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Parse a line. Blank lines yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match word.to_ascii_lowercase().as_str() {
            "connect" => Self::Connect,
            "names" | "ls" => Self::Names,
            "name" | "get" => Self::Name(arg),
            "add" => Self::Add(arg),
            "remove" | "rm" => Self::Remove(arg),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "exit" | "quit" => Self::Exit,
            _ => Self::Unknown(word.to_string()),
        };
        Some(command)
    }

    /// Whether the command needs a connected account, like the page hides
    /// the contract functions until the wallet is connected.
    #[must_use]
    pub const fn needs_session(&self) -> bool {
        matches!(
            self,
            Self::Names | Self::Name(_) | Self::Add(_) | Self::Remove(_)
        )
    }
}

/// Render a notice as a single line.
#[must_use]
pub fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "ok",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.message)
}

/// Render the controller's view state.
pub async fn render_status(controller: &NameDappController) -> String {
    let view = controller.snapshot().await;
    let refresh = controller.settings().refresh;
    let mut out = String::new();

    match view.wallet_address {
        Some(address) => {
            let _ = writeln!(out, "Wallet:   {address}");
        }
        None => {
            let _ = writeln!(out, "Wallet:   not connected");
        }
    }
    if let Some(address) = controller.contract_address() {
        let _ = writeln!(out, "Contract: {}", explorer_url(address));
    }
    if view.names_visible {
        let stale = if view.names.is_stale() { " (stale)" } else { "" };
        let _ = writeln!(out, "Names:    {}{stale}", view.names.display());
    }
    if view.name_visible {
        let _ = writeln!(out, "Name:     {}", view.name);
    }
    for action in [Action::AddName, Action::RemoveName] {
        if let Some(line) = view.status_line(action, refresh) {
            let _ = writeln!(out, "{action}: {line}");
        }
    }

    out.trim_end().to_string()
}

/// Interactive read-eval loop.
pub struct Console {
    controller: Arc<NameDappController>,
    notices: Option<mpsc::UnboundedReceiver<Notice>>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Create a console. `notices` is the receiving end of the controller's
    /// notifier channel.
    #[must_use]
    pub const fn new(
        controller: Arc<NameDappController>,
        notices: mpsc::UnboundedReceiver<Notice>,
    ) -> Self {
        Self {
            controller,
            notices: Some(notices),
        }
    }

    /// Run until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin fails.
    #[allow(clippy::print_stdout)] // console intentionally prints to stdout
    pub async fn run(mut self) -> io::Result<()> {
        if let Some(mut notices) = self.notices.take() {
            tokio::spawn(async move {
                while let Some(notice) = notices.recv().await {
                    println!("\n{}", format_notice(&notice));
                    print!("{PROMPT}");
                    let _ = io::stdout().flush();
                }
            });
        }

        println!("NameDapp console (type 'help' for commands, 'exit' to quit)");
        if !self.controller.has_wallet() {
            println!("No wallet configured; set --private-key or --mnemonic.");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{PROMPT}");
            let _ = io::stdout().flush();

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            debug!(?command, "console command");

            if command == Command::Exit {
                break;
            }
            self.execute(command).await;
        }

        Ok(())
    }

    #[allow(clippy::print_stdout)] // console intentionally prints to stdout
    async fn execute(&self, command: Command) {
        let controller = &self.controller;

        if command.needs_session() && !controller.snapshot().await.is_connected() {
            println!("Connect your wallet first ('connect').");
            return;
        }

        // Failures are reported through the notice channel.
        match command {
            Command::Connect => {
                if let Ok(address) = controller.connect().await {
                    println!("Connected: {address}");
                }
            }
            Command::Names => {
                if controller.load_all_names().await.is_ok() {
                    println!("{}", controller.snapshot().await.names.display());
                }
            }
            Command::Name(index) => {
                if let Some(index) = index {
                    controller.set_get_index(index).await;
                }
                if let Ok(name) = controller.load_name().await {
                    println!("{name}");
                }
            }
            Command::Add(name) => {
                if let Some(name) = name {
                    controller.set_new_name(name).await;
                }
                self.spawn_mutation(Action::AddName);
            }
            Command::Remove(index) => {
                if let Some(index) = index {
                    controller.set_remove_index(index).await;
                }
                self.spawn_mutation(Action::RemoveName);
            }
            Command::Status => println!("{}", render_status(controller).await),
            Command::Help => println!("{HELP}"),
            Command::Unknown(word) => println!("Unknown command '{word}'. Type 'help'."),
            Command::Exit => {}
        }
    }

    /// Run a mutating action in the background so the prompt stays usable
    /// while the transaction waits for confirmation.
    fn spawn_mutation(&self, action: Action) {
        let controller = Arc::clone(&self.controller);
        tokio::spawn(async move {
            let result = match action {
                Action::AddName => controller.add_name().await,
                Action::RemoveName => controller.remove_name().await,
            };
            if let Ok(tx_hash) = result {
                debug!(%action, %tx_hash, "background transaction confirmed");
            }
        });
    }
}
