pub mod args;
mod shell;

pub use args::{Cli, Commands};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::quotes::category::CategoryIndex;

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?.with_overrides(cli.data_dir, cli.remote_url)?;
    let app = App::init(config)?;

    let result = dispatch(&app, cli.command).await;
    app.shutdown().await;
    result
}

async fn dispatch(app: &App, command: Commands) -> Result<()> {
    let mut rng = StdRng::from_entropy();

    match command {
        Commands::Show { category } => {
            let view = match category {
                Some(category) => app.renderer.show_in(&category, &mut rng).await,
                None => app.renderer.show(&mut rng).await,
            };
            println!("{}", view);
        }
        Commands::Add { text, category } => {
            let quote = app.store.add(&text, &category).await?;
            println!("Quote added successfully! {}", quote);
        }
        Commands::Categories => {
            let selected = app.store.selected_category().await;
            print_categories(&app.store.categories().await, &selected);
        }
        Commands::Select { category } => {
            app.store.select_category(&category).await?;
            println!("Filter set to {}", category);
        }
        Commands::Sync => {
            let mut rx = app.sync.subscribe();
            let outcome = app.sync.sync_once().await;
            if let Ok(note) = rx.try_recv() {
                println!("{}", note.message);
            }
            if outcome?.is_none() {
                println!("Sync already in progress.");
            }
        }
        Commands::Publish { text, category } => {
            let quote = app.sync.publish(&text, &category).await?;
            println!("Quote posted to server: {}", quote);
        }
        Commands::Export { path } => {
            let count = app.store.export_to(&path).await?;
            println!("Exported {} quotes to {}", count, path.display());
        }
        Commands::Import { path } => {
            let count = app.store.import_from(&path).await?;
            println!("Quotes imported successfully! ({} quotes)", count);
        }
        Commands::Shell => shell::run(app, &mut rng).await?,
    }

    Ok(())
}

fn print_categories(index: &CategoryIndex, selected: &str) {
    for category in index.categories() {
        let marker = if category == selected { "*" } else { " " };
        println!("{} {}", marker, category);
    }
}
