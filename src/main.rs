use clap::{Parser, Subcommand};
use eat_what::{
    add_async, list_items, logging, recommend, remove, CatalogStore, Category, Config, ImageSource,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Food and drink picture catalogs
#[derive(Parser, Debug)]
#[command(name = "eat-what", version, about)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick a random item from a catalog
    Recommend { category: String },
    /// Add an item from exactly one image file
    Add {
        category: String,
        name: String,
        images: Vec<PathBuf>,
    },
    /// Delete an item and its image
    Remove { category: String, name: String },
    /// Show every item in a catalog
    List { category: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> eat_what::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let store = Arc::new(CatalogStore::from_config(&config)?);

    match cli.command {
        Command::Recommend { category } => {
            let catalog = store.resolve_category(&category)?;
            match recommend(catalog) {
                Some(rec) => {
                    println!("{}", rec.caption);
                    println!("{}", rec.image_path.display());
                }
                None => println!("Nothing in {} yet.", catalog.category()),
            }
        }
        Command::Add {
            category,
            name,
            images,
        } => {
            let category: Category = category.parse()?;
            let images = images.into_iter().map(ImageSource::Path).collect();
            add_async(Arc::clone(&store), category, name.clone(), images).await?;
            println!("✅ Added「{}」", name);
        }
        Command::Remove { category, name } => {
            remove(store.resolve_category(&category)?, &name)?;
            println!("✅ Removed「{}」", name);
        }
        Command::List { category } => {
            let items = list_items(store.resolve_category(&category)?);
            println!("{} {} items:", items.len(), category);
            for item in items {
                println!("  {}", item);
            }
        }
    }

    Ok(())
}
