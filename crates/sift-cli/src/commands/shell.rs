//! Interactive search shell
//!
//! Each plain input line behaves like the text box changing: it is handed
//! to the controller's debounced search. Lines starting with `:` are
//! commands.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output::render_state;
use crate::AppContext;

/// How long to wait for outstanding work once stdin closes
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

const HELP: &str = "\
Type to search (debounced). Commands:
  :submit <text>  search immediately
  :more           load the next page
  :retry          re-run the last query
  :clear          clear the search
  :state          print the current state
  :help           show this help
  :quit           exit";

#[derive(Debug, PartialEq, Eq)]
enum ShellInput {
    /// Raw text, searched after the debounce
    Text(String),
    Submit(String),
    More,
    Retry,
    Clear,
    State,
    Help,
    Quit,
    Unknown(String),
}

impl ShellInput {
    fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return Self::Text(line.to_string());
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "submit" | "s" => Self::Submit(rest.to_string()),
            "more" | "m" => Self::More,
            "retry" | "r" => Self::Retry,
            "clear" | "c" => Self::Clear,
            "state" => Self::State,
            "help" | "h" => Self::Help,
            "quit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

pub async fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let controller = ctx.controller()?;
    let format = ctx.format;

    let mut updates = controller.subscribe();
    let renderer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            println!("{}\n", render_state(&state, format));
        }
    });

    println!("{}\n", HELP);

    let mut quit = false;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ShellInput::parse(&line) {
            ShellInput::Text(text) => controller.search(&text),
            ShellInput::Submit(text) => controller.search_with_delay(&text, Duration::ZERO),
            ShellInput::More => controller.load_more(),
            ShellInput::Retry => controller.retry(),
            ShellInput::Clear => controller.clear(),
            ShellInput::State => println!("{}\n", render_state(&controller.state(), format)),
            ShellInput::Help => println!("{}\n", HELP),
            ShellInput::Quit => {
                quit = true;
                break;
            }
            ShellInput::Unknown(name) => eprintln!("Unknown command ':{}' (try :help)", name),
        }
    }

    // Piped input ends before its searches do; let them finish
    if !quit
        && tokio::time::timeout(DRAIN_TIMEOUT, controller.settled())
            .await
            .is_err()
    {
        tracing::warn!("Gave up waiting for pending search after {:?}", DRAIN_TIMEOUT);
    }

    controller.dispose();
    renderer.await?;
    Ok(())
}
