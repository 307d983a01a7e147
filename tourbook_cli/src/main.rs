mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tourbook_lib::{validation, Client, Config, LocalStore, TourbookError};

use crate::commands::Context;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "tourbook")]
#[command(about = "Browse tours and manage vendor listings on Tourbook")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Content language: en, ru or uz (remembered for later runs)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the tour catalogue
    Tours(Box<commands::tours::ToursArgs>),
    /// Browse blog posts
    Blogs(commands::blogs::BlogsArgs),
    /// List your own tours (vendor)
    MyTours(commands::my_tours::MyToursArgs),
    /// Show, draft, create, update or delete a tour
    Tour(commands::tour::TourArgs),
    /// Show, draft, create, update or delete a blog post
    Blog(commands::blog::BlogArgs),
    /// Turn an Instagram post into a tour draft
    ImportInstagram(commands::import_instagram::ImportInstagramArgs),
    /// Build a Telegram link to book a tour
    Contact(commands::contact::ContactArgs),
    /// Store a vendor session token
    Login(commands::login::LoginArgs),
    /// Forget the stored session token
    Logout,
}

fn is_unauthorized(err: &anyhow::Error) -> bool {
    if let Some(e) = err.downcast_ref::<TourbookError>() {
        return e.is_unauthorized();
    }
    err.downcast_ref::<tourbook_lib::tourbook_api::Error>()
        .is_some_and(|e| e.is_unauthorized())
}

fn build_context(cli: &Cli) -> Result<Context> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }

    let store = LocalStore::open(&config.store_path)?;
    let locale = match cli.lang.as_deref() {
        Some(lang) => {
            let locale = validation::validate_locale(lang)?;
            store.set_locale(locale)?;
            locale
        }
        None => store.locale()?.unwrap_or(config.locale),
    };

    let client = Client::with_base_url(&config.base_url)?
        .with_locale(locale)
        .with_token(store.token()?);

    Ok(Context {
        client,
        store,
        config,
        locale,
        format: OutputFormat::from_name(&cli.output),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("tourbook=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let ctx = build_context(&cli)?;

    let result = match &cli.command {
        Commands::Tours(args) => commands::tours::run(args.as_ref(), &ctx).await,
        Commands::Blogs(args) => commands::blogs::run(args, &ctx).await,
        Commands::MyTours(args) => commands::my_tours::run(args, &ctx).await,
        Commands::Tour(args) => commands::tour::run(args, &ctx).await,
        Commands::Blog(args) => commands::blog::run(args, &ctx).await,
        Commands::ImportInstagram(args) => commands::import_instagram::run(args, &ctx).await,
        Commands::Contact(args) => commands::contact::run(args, &ctx).await,
        Commands::Login(args) => commands::login::run(args, &ctx),
        Commands::Logout => commands::login::logout(&ctx),
    };

    if let Err(ref e) = result {
        if is_unauthorized(e) {
            ctx.store.clear_token()?;
            eprintln!("Session expired; run `tourbook login` to sign in again.");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tourbook", "tours", "--search", "samarkand", "--lang", "ru", "--output", "json",
        ])
        .unwrap();
        assert_eq!(cli.lang.as_deref(), Some("ru"));
        assert_eq!(cli.output, "json");
        match cli.command {
            Commands::Tours(args) => {
                assert_eq!(args.filters.search.as_deref(), Some("samarkand"));
                assert_eq!(args.filters.sort, "newest");
                assert_eq!(args.paging.pages, 1);
            }
            _ => panic!("expected tours"),
        }
    }

    #[test]
    fn paging_flags_conflict() {
        assert!(Cli::try_parse_from(["tourbook", "blogs", "--all", "--pages", "3"]).is_err());
        assert!(Cli::try_parse_from(["tourbook", "tours", "--live-search", "--interactive"]).is_err());
    }

    #[test]
    fn my_tours_defaults_to_all_statuses() {
        let cli = Cli::try_parse_from(["tourbook", "my-tours", "--type", "hiking"]).unwrap();
        match cli.command {
            Commands::MyTours(args) => {
                assert_eq!(args.status, "all");
                assert_eq!(args.filters.tour_type.as_deref(), Some("hiking"));
            }
            _ => panic!("expected my-tours"),
        }
    }

    #[test]
    fn tour_subcommands_parse() {
        let cli =
            Cli::try_parse_from(["tourbook", "tour", "draft", "d.toml", "--from", "7", "--wizard"])
                .unwrap();
        match cli.command {
            Commands::Tour(args) => match args.action {
                commands::tour::TourAction::Draft { file, from, wizard } => {
                    assert_eq!(file, PathBuf::from("d.toml"));
                    assert_eq!(from, Some(7));
                    assert!(wizard);
                }
                _ => panic!("expected draft"),
            },
            _ => panic!("expected tour"),
        }
    }

    #[test]
    fn contact_defaults_to_one_guest() {
        let cli = Cli::try_parse_from([
            "tourbook", "contact", "12", "--name", "Aziz", "--phone", "+998 90 123 45 67",
        ])
        .unwrap();
        match cli.command {
            Commands::Contact(args) => {
                assert_eq!(args.tour_id, 12);
                assert_eq!(args.guests, 1);
                assert!(args.telegram.is_none());
            }
            _ => panic!("expected contact"),
        }
    }
}
