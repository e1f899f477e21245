//! Forge Client command line

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forge_client::application::dto::ExportFormat;
use forge_client::application::services::NotificationLevel;
use forge_client::domain::entities::LibraryRow;
use forge_client::domain::value_objects::{Ability, EntityKind, LibrarySort, RecordId, Section};
use forge_client::infrastructure::config::AppConfig;
use forge_client::infrastructure::state::AppState;

#[derive(Parser)]
#[command(name = "forge-client", about = "Character, item and spell creation for 5e")]
struct Cli {
    /// Session state to restore, as a URL query string
    #[arg(long, global = true, default_value = "")]
    query: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Backend health and generation engine
    Status,
    /// Roll and generate a random character
    QuickNpc(QuickNpcArgs),
    /// List a saved library
    Library(LibraryArgs),
}

#[derive(Args)]
struct QuickNpcArgs {
    #[arg(long, value_parser = parse_format)]
    export: Option<ExportFormat>,
}

#[derive(Args)]
struct LibraryArgs {
    kind: LibraryKind,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_parser = parse_sort)]
    sort: Option<LibrarySort>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LibraryKind {
    Characters,
    Items,
    Spells,
    Creatures,
}

impl From<LibraryKind> for EntityKind {
    fn from(kind: LibraryKind) -> Self {
        match kind {
            LibraryKind::Characters => EntityKind::Character,
            LibraryKind::Items => EntityKind::MagicItem,
            LibraryKind::Spells => EntityKind::Spell,
            LibraryKind::Creatures => EntityKind::Creature,
        }
    }
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse()
}

fn parse_sort(value: &str) -> Result<LibrarySort, String> {
    value.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forge_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Forge API: {}", config.api_base_url);
    tracing::info!("  Downloads: {}", config.download_dir.display());

    let state = AppState::new(config).await?;
    state.start(&cli.query).await;

    let result = match cli.command {
        Command::Status => status(&state).await,
        Command::QuickNpc(args) => quick_npc(&state, args).await,
        Command::Library(args) => library(&state, args).await,
    };

    for notification in state.notifier.active() {
        match notification.level {
            NotificationLevel::Error => eprintln!("! {}", notification.message),
            _ => eprintln!("* {}", notification.message),
        }
    }
    result
}

async fn status(state: &AppState) -> Result<()> {
    let health = state.engine.health().await;
    println!("api:     {}", state.config.api_base_url);
    println!(
        "backend: {}",
        if health.api_ok == Some(true) { "online" } else { "offline" }
    );
    println!("engine:  {}", state.engine.current().await);
    if let Some(model) = health.model {
        println!("image:   {} on {} ({})", model.image.model, model.image.device, model.image.dtype);
        println!(
            "text:    {} at {} ({})",
            model.text.model,
            model.text.url,
            if model.text.reachable { "reachable" } else { "unreachable" }
        );
    }
    println!("section: {}", state.navigation.current().await);
    Ok(())
}

async fn quick_npc(state: &AppState, args: QuickNpcArgs) -> Result<()> {
    state
        .navigation
        .start_new(EntityKind::Character)
        .await
        .context("Could not open the character form")?;
    state
        .characters
        .quick_generate()
        .await
        .context("Quick generation failed")?;

    let view = state.characters.view().await;
    let draft = view.draft.context("No character was generated")?;
    println!(
        "{} - level {} {} {} ({})",
        view.name, draft.level, draft.race, draft.cls, draft.background
    );
    let scores: Vec<String> = Ability::ALL
        .iter()
        .map(|a| format!("{} {}", a, draft.abilities.score(*a)))
        .collect();
    println!("{}", scores.join("  "));
    if let Some(backstory) = &view.backstory {
        println!();
        println!("{}", backstory.summary);
    }

    if let Some(format) = args.export {
        let path = state
            .characters
            .export(format)
            .await
            .with_context(|| format!("{} export failed", format))?;
        println!("saved {}", path.display());
    }
    Ok(())
}

async fn library(state: &AppState, args: LibraryArgs) -> Result<()> {
    let kind = EntityKind::from(args.kind);
    let mut params = state.url.snapshot().library(kind).clone();
    if let Some(page) = args.page {
        params.page = page.max(1);
    }
    if let Some(search) = args.search {
        params.search = search;
    }
    if let Some(sort) = args.sort {
        params.sort = sort;
    }

    match kind {
        EntityKind::Character => {
            let library = state.characters.library();
            library.restore(&params).await;
            state.navigation.navigate(Section::library_for(kind)).await?;
            let view = library.view().await;
            print_rows(view.rows(), view.page(), view.page_count(), view.total(), &["cls", "race"]);
        }
        EntityKind::MagicItem => {
            let library = state.items.library();
            library.restore(&params).await;
            state.navigation.navigate(Section::library_for(kind)).await?;
            let view = library.view().await;
            print_rows(view.rows(), view.page(), view.page_count(), view.total(), &["item_type", "rarity"]);
        }
        EntityKind::Spell => {
            let library = state.spells.library();
            library.restore(&params).await;
            state.navigation.navigate(Section::library_for(kind)).await?;
            let view = library.view().await;
            print_rows(view.rows(), view.page(), view.page_count(), view.total(), &["school"]);
        }
        EntityKind::Creature => {
            let library = state.creatures.library();
            library.restore(&params).await;
            state.navigation.navigate(Section::library_for(kind)).await?;
            let view = library.view().await;
            print_rows(
                view.rows(),
                view.page(),
                view.page_count(),
                view.total(),
                &["creature_type", "challenge_rating"],
            );
        }
    }
    println!("query: ?{}", state.url.query_string());
    Ok(())
}

fn print_rows<I: RecordId>(
    rows: &[LibraryRow<I>],
    page: u32,
    page_count: u32,
    total: u64,
    columns: &[&str],
) {
    if rows.is_empty() {
        println!("(empty)");
    }
    for row in rows {
        let summary: Vec<String> = columns
            .iter()
            .filter_map(|c| row.summary.get(*c).map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            }))
            .collect();
        println!("#{:<5} {:<32} {}", row.id.to_string(), row.name, summary.join(" / "));
    }
    println!("page {} of {} ({} total)", page, page_count.max(1), total);
}

