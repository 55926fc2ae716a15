use std::path::PathBuf;

use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::app::App;
use crate::error::Result;
use crate::sync::merge::MergeReport;
use crate::sync::types::{Notification, NotificationKind};

const HELP: &str = "\
Commands:
  new                        show a random quote under the current filter
  filter <category>          change the filter (\"all\" for everything)
  categories                 list categories
  add <text> | <category>    add a quote
  publish <text> | <category> post a quote to the server
  last                       show the last viewed quote
  sync                       sync with the server now
  export [path]              write quotes to a JSON file
  import <path>              replace quotes from a JSON file
  help                       show this help
  quit                       leave";

const SYNC_BUSY: &str = "Sync already in progress.";

#[derive(Debug, PartialEq)]
enum ShellCommand {
    New,
    Filter(String),
    Categories,
    Add { text: String, category: String },
    Publish { text: String, category: String },
    Last,
    Sync,
    Export(PathBuf),
    Import(PathBuf),
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let text_and_category = |rest: &str| -> std::result::Result<(String, String), String> {
        rest.split_once('|')
            .map(|(t, c)| (t.trim().to_string(), c.trim().to_string()))
            .ok_or_else(|| "expected: <text> | <category>".to_string())
    };

    match word {
        "new" | "show" => Ok(ShellCommand::New),
        "filter" if !rest.is_empty() => Ok(ShellCommand::Filter(rest.to_string())),
        "filter" => Err("expected: filter <category>".to_string()),
        "categories" => Ok(ShellCommand::Categories),
        "add" => {
            let (text, category) = text_and_category(rest)?;
            Ok(ShellCommand::Add { text, category })
        }
        "publish" => {
            let (text, category) = text_and_category(rest)?;
            Ok(ShellCommand::Publish { text, category })
        }
        "last" => Ok(ShellCommand::Last),
        "sync" => Ok(ShellCommand::Sync),
        "export" if rest.is_empty() => Ok(ShellCommand::Export(PathBuf::from("quotes.json"))),
        "export" => Ok(ShellCommand::Export(PathBuf::from(rest))),
        "import" if !rest.is_empty() => Ok(ShellCommand::Import(PathBuf::from(rest))),
        "import" => Err("expected: import <path>".to_string()),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

fn print_notification(note: &Notification) {
    let tag = match note.kind {
        NotificationKind::Synced => "sync",
        NotificationKind::ConflictsResolved => "conflict",
        NotificationKind::Error => "error",
    };
    println!("[{} {}] {}", note.at.format("%H:%M:%S"), tag, note.message);
}

pub async fn run<R: Rng + ?Sized>(app: &App, rng: &mut R) -> Result<()> {
    let mut notifications = app.sync.subscribe();
    app.sync.start(app.config.sync_interval).await;

    println!("{}", app.renderer.show(rng).await);
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            note = notifications.recv() => match note {
                Ok(note) => print_notification(&note),
                Err(RecvError::Lagged(n)) => qwarn!("shell: dropped {} notifications", n),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = execute(app, command, rng).await {
                            println!("{}", e);
                        }
                    }
                    Err(usage) => println!("{}", usage),
                }
            }
        }
    }

    Ok(())
}

/// Success and failure arrive through the notification stream; only a
/// skipped run needs a direct reply.
fn sync_reply(outcome: &Result<Option<MergeReport>>) -> Option<&'static str> {
    match outcome {
        Ok(None) => Some(SYNC_BUSY),
        _ => None,
    }
}

async fn execute<R: Rng + ?Sized>(app: &App, command: ShellCommand, rng: &mut R) -> Result<()> {
    match command {
        ShellCommand::New => println!("{}", app.renderer.show(rng).await),
        ShellCommand::Filter(category) => {
            app.store.select_category(&category).await?;
            println!("{}", app.renderer.show(rng).await);
        }
        ShellCommand::Categories => {
            let selected = app.store.selected_category().await;
            super::print_categories(&app.store.categories().await, &selected);
        }
        ShellCommand::Add { text, category } => {
            app.store.add(&text, &category).await?;
            println!("Quote added successfully!");
            println!("{}", app.renderer.show(rng).await);
        }
        ShellCommand::Publish { text, category } => {
            let quote = app.sync.publish(&text, &category).await?;
            println!("Quote posted to server: {}", quote);
        }
        ShellCommand::Last => match app.renderer.last_viewed() {
            Some(quote) => println!("{}", quote),
            None => println!("No quote viewed yet."),
        },
        ShellCommand::Sync => {
            if let Some(message) = sync_reply(&app.sync.sync_once().await) {
                println!("{}", message);
            }
        }
        ShellCommand::Export(path) => {
            let count = app.store.export_to(&path).await?;
            println!("Exported {} quotes to {}", count, path.display());
        }
        ShellCommand::Import(path) => {
            let count = app.store.import_from(&path).await?;
            println!("Quotes imported successfully! ({} quotes)", count);
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}
