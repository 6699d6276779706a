use std::error::Error;
#[cfg(feature = "web")]
use std::net::SocketAddr;
#[cfg(feature = "web")]
use std::time::Duration;

use atty::Stream;
use clap::{Parser, Subcommand};
use living_itan::model::{CulturalContent, LoreKind};
use living_itan::{
    ApiClient, ApiError, Category, CategoryDetail, ClientConfig, DailyProverb, DeityEntry,
    Folktale, Language, Proverb, ProverbText, SearchResult,
};
#[cfg(feature = "web")]
use living_itan::session::DEFAULT_MAX_SESSIONS;
#[cfg(feature = "web")]
use living_itan::web::{self, WebConfig};
use serde::Serialize;
use termimad::{FmtText, MadSkin, terminal_size};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "living-itan",
    about = "Explore the Yorùbá Òrìṣà pantheon, proverbs and folktales",
    version
)]
pub struct Cli {
    /// Emit JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Backend origin; every route lives under `<origin>/api`.
    #[arg(
        long,
        global = true,
        env = "ITAN_BACKEND_URL",
        default_value = "http://127.0.0.1:8001"
    )]
    backend: String,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the interactive encyclopedia over HTTP.
    #[cfg(feature = "web")]
    Serve {
        /// Socket address to bind.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
        /// Milliseconds an interaction waits for its fetches before rendering.
        #[arg(long, default_value_t = 1500)]
        settle_ms: u64,
        /// Browser sessions kept before the least recently used is dropped.
        #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
        max_sessions: usize,
    },
    /// Browse the Òrìṣà pantheon.
    #[command(subcommand)]
    Pantheon(PantheonCommand),
    /// Browse òwe (proverbs).
    #[command(subcommand)]
    Proverb(ProverbCommand),
    /// Read Àlọ́ Ìjàpá folktales.
    #[command(subcommand)]
    Tales(TalesCommand),
}

#[derive(Subcommand, Debug)]
enum PantheonCommand {
    /// List every Òrìṣà with its domains.
    List,
    /// Show the full profile of one Òrìṣà.
    Show {
        /// Òrìṣà ID, e.g. `shango`.
        id: String,
        /// Tell the story in Yorùbá.
        #[arg(long)]
        yoruba: bool,
    },
    /// Ask the backend to generate lore about an Òrìṣà.
    Lore {
        /// Òrìṣà name as it should appear in the text.
        name: String,
        #[arg(long, value_enum, default_value_t = LoreKind::Story)]
        kind: LoreKind,
    },
}

#[derive(Subcommand, Debug)]
enum ProverbCommand {
    /// Today's proverb.
    Daily,
    /// List proverb categories.
    Categories,
    /// Show every proverb in a category.
    Category {
        /// Category ID, e.g. `wisdom`.
        id: String,
    },
    /// Search proverbs across all categories.
    Search {
        /// Text to match in the Yorùbá, translation or meaning.
        query: String,
    },
}

#[derive(Subcommand, Debug)]
enum TalesCommand {
    /// List the folktales.
    List,
    /// Read one folktale.
    Show {
        /// Folktale ID.
        id: String,
    },
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.command.is_server());
    let client = ApiClient::new(ClientConfig::with_backend(cli.backend.clone()))?;
    debug!(backend = client.api_root(), "client ready");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(cli.command, client, cli.json))
}

impl Command {
    fn is_server(&self) -> bool {
        #[cfg(feature = "web")]
        if matches!(self, Command::Serve { .. }) {
            return true;
        }
        false
    }
}

fn init_tracing(verbose: bool, server: bool) {
    let level = match (verbose, server) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn dispatch(command: Command, client: ApiClient, as_json: bool) -> Result<(), Box<dyn Error>> {
    match command {
        #[cfg(feature = "web")]
        Command::Serve {
            addr,
            settle_ms,
            max_sessions,
        } => {
            let config = WebConfig {
                addr,
                settle: Duration::from_millis(settle_ms),
                max_sessions,
            };
            web::serve(config, client).await?;
            Ok(())
        }
        Command::Pantheon(PantheonCommand::List) => {
            let deities = client.list_deities().await?;
            emit(as_json, &deities, || print_deity_table(&deities))
        }
        Command::Pantheon(PantheonCommand::Show { id, yoruba }) => {
            handle_show(&client, &id, yoruba, as_json).await
        }
        Command::Pantheon(PantheonCommand::Lore { name, kind }) => {
            let lore = client.cultural_content(&name, kind).await?;
            emit(as_json, &lore, || print_lore(&lore))
        }
        Command::Proverb(ProverbCommand::Daily) => {
            let daily = client.daily_proverb().await?;
            emit(as_json, &daily, || print_daily(&daily))
        }
        Command::Proverb(ProverbCommand::Categories) => {
            let categories = client.categories().await?;
            emit(as_json, &categories, || print_category_table(&categories))
        }
        Command::Proverb(ProverbCommand::Category { id }) => {
            let detail = client.category(&id).await?;
            emit(as_json, &detail, || print_category(&detail))
        }
        Command::Proverb(ProverbCommand::Search { query }) => {
            let query = query.trim();
            if query.is_empty() {
                return Err("Search query cannot be empty".into());
            }
            let results = client.search_proverbs(query).await?;
            emit(as_json, &results, || print_search(query, &results))
        }
        Command::Tales(TalesCommand::List) => {
            let tales = client.folktales().await?;
            emit(as_json, &tales, || print_tale_table(&tales))
        }
        Command::Tales(TalesCommand::Show { id }) => {
            let tale = client
                .folktales()
                .await?
                .into_iter()
                .find(|tale| tale.id == id)
                .ok_or_else(|| format!("No folktale found for ID {id:?}"))?;
            emit(as_json, &tale, || print_tale(&tale))
        }
    }
}

async fn handle_show(
    client: &ApiClient,
    id: &str,
    yoruba: bool,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let entry = match client.deity(id).await {
        Ok(entry) => entry,
        Err(ApiError::NotFound(_)) => return Err(format!("No Òrìṣà found for ID {id:?}").into()),
        Err(err) => return Err(err.into()),
    };
    let story = profile_story(client, &entry, yoruba).await?;
    let language = if yoruba {
        Language::Yoruba
    } else {
        Language::English
    };

    if as_json {
        let payload = serde_json::json!({
            "entry": entry,
            "language": language,
            "story": story,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_entry(&entry, language, &story);
    }
    Ok(())
}

/// The story to print: the English text, or a Yorùbá translation that falls
/// back to the stored `yoruba_story` when the translator fails.
async fn profile_story(
    client: &ApiClient,
    entry: &DeityEntry,
    yoruba: bool,
) -> Result<String, Box<dyn Error>> {
    if !yoruba {
        return Ok(entry.story.clone());
    }
    match client.translate(&entry.story, Language::Yoruba).await {
        Ok(text) => Ok(text),
        Err(err) => {
            debug!(error = %err, "translation failed, using stored Yorùbá story");
            entry
                .yoruba_story
                .clone()
                .ok_or_else(|| format!("No Yorùbá story available for {}: {err}", entry.name).into())
        }
    }
}

fn emit<T: Serialize + ?Sized>(
    as_json: bool,
    value: &T,
    print: impl FnOnce(),
) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print();
    }
    Ok(())
}

fn print_deity_table(deities: &[DeityEntry]) {
    if deities.is_empty() {
        println!("No Òrìṣà available.");
        return;
    }
    let width = deities
        .iter()
        .map(|entry| entry.id.chars().count())
        .max()
        .unwrap_or(2)
        .max("ID".len());
    let name_width = deities
        .iter()
        .map(|entry| entry.name.chars().count())
        .max()
        .unwrap_or(4)
        .max("NAME".len());
    println!("{:<width$}  {:<name_width$}  DOMAINS", "ID", "NAME");
    println!("{:-<width$}  {:-<name_width$}  -------", "", "");
    for entry in deities {
        println!(
            "{:<width$}  {}  {}",
            entry.id,
            pad(&entry.name, name_width),
            entry.domains.join(", ")
        );
    }
}

fn print_entry(entry: &DeityEntry, language: Language, story: &str) {
    println!("{} ({})", entry.name, entry.yoruba_name);
    println!("ID: {}", entry.id);
    if !entry.domains.is_empty() {
        println!("Domains: {}", entry.domains.join(", "));
    }
    if !entry.colors.is_empty() {
        println!("Sacred Colors: {}", entry.colors.join(", "));
    }
    println!("Sacred Number: {}", entry.sacred_number);
    if !entry.symbols.is_empty() {
        println!("Sacred Symbols: {}", entry.symbols.join(", "));
    }
    render_markdown_block(&format!("Story ({})", language.label()), story);

    if !entry.diaspora.traditions.is_empty() || !entry.diaspora.regions.is_empty() {
        println!("\nDiaspora Connections:");
        for (tradition, description) in &entry.diaspora.traditions {
            println!("  {}: {description}", living_itan::model::tradition_label(tradition));
        }
        if !entry.diaspora.regions.is_empty() {
            println!("  Regions: {}", entry.diaspora.regions_label());
        }
    }
}

fn print_lore(lore: &CulturalContent) {
    println!("{} ({})", lore.orisha_name, lore.content_type);
    render_markdown_block("Generated Content", &lore.content);
}

fn print_daily(daily: &DailyProverb) {
    match &daily.date {
        Some(date) => println!("Òwe Oni ({date})"),
        None => println!("Òwe Oni"),
    }
    match &daily.proverb {
        ProverbText::Plain(text) => println!("  {text}"),
        ProverbText::Structured(proverb) => print_proverb(proverb),
    }
}

fn print_proverb(proverb: &Proverb) {
    println!("  {}", proverb.yoruba);
    println!("    Literal: {}", proverb.literal);
    println!("    Meaning: {}", proverb.meaning);
    if !proverb.context.is_empty() {
        println!("    Usage: {}", proverb.context);
    }
}

fn print_category_table(categories: &[Category]) {
    if categories.is_empty() {
        println!("No proverb categories available.");
        return;
    }
    let width = categories
        .iter()
        .map(|category| category.id.chars().count())
        .max()
        .unwrap_or(2)
        .max("ID".len());
    println!("{:<width$}  {:>5}  NAME", "ID", "COUNT");
    println!("{:-<width$}  {:->5}  ----", "", "");
    for category in categories {
        println!(
            "{:<width$}  {:>5}  {} ({})",
            category.id, category.count, category.name, category.name_yoruba
        );
    }
}

fn print_category(detail: &CategoryDetail) {
    println!(
        "{} ({})",
        detail.category.name, detail.category.name_yoruba
    );
    if detail.proverbs.is_empty() {
        println!("No proverbs in this category yet.");
        return;
    }
    for proverb in &detail.proverbs {
        println!();
        print_proverb(proverb);
    }
}

fn print_search(query: &str, results: &[SearchResult]) {
    if results.is_empty() {
        println!("No proverbs matched \"{query}\".");
        return;
    }
    println!("Search results for \"{query}\":");
    for result in results {
        println!("\n[{}]", result.category_name);
        print_proverb(&result.proverb);
    }
}

fn print_tale_table(tales: &[Folktale]) {
    if tales.is_empty() {
        println!("No folktales available.");
        return;
    }
    let width = tales
        .iter()
        .map(|tale| tale.id.chars().count())
        .max()
        .unwrap_or(2)
        .max("ID".len());
    println!("{:<width$}  TITLE", "ID");
    println!("{:-<width$}  -----", "");
    for tale in tales {
        let mut characters = tale.card_characters().join(", ");
        if tale.characters.len() > tale.card_characters().len() {
            characters.push_str(", …");
        }
        println!("{:<width$}  {} ({})", tale.id, tale.title, tale.title_yoruba);
        if !characters.is_empty() {
            println!("{:<width$}  Characters: {characters}", "");
        }
    }
}

fn print_tale(tale: &Folktale) {
    println!("{} ({})", tale.title, tale.title_yoruba);
    println!("{}", tale.summary);
    render_markdown_block("The Story", &tale.full_story);
    render_markdown_block("Moral of the Story", &tale.moral);
    if !tale.characters.is_empty() {
        println!("\nCharacters: {}", tale.characters.join(", "));
    }
}

/// Left-aligns by character count; `{:<n}` pads multi-byte names short.
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    println!("\n{title}:");
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}
