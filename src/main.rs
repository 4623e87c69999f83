use arkham_deck_rs::{
    campaign::{CampaignStore, Difficulty, NewCampaign, WeaknessSet},
    config::{init_logging, Settings, VerbosityLevel},
    core::{CardCode, CardType, Faction, PackCode, TabooSet},
    deck::{
        compute_changes, parse_deck_record, spent_xp, DeckValidation, DrawSimulator,
        ParseOptions, ParsedDeck,
    },
    filter::{CardFilter, Range},
    loader::{CardDatabase, Deck, DeckLoader, PlayerCards, TabooLoader},
    DeckError, Result,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Verbosity level (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(VerbosityArg)
    }
}

#[derive(Parser)]
#[command(name = "arkham")]
#[command(about = "Arkham deck tools - parse, validate and track decks and campaigns", long_about = None)]
struct Cli {
    /// Settings JSON providing defaults for the options below
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Card-database JSON file or directory of pack files
    #[arg(long, global = true, value_name = "PATH")]
    cards: Option<PathBuf>,

    /// Taboo list JSON
    #[arg(long, global = true, value_name = "FILE")]
    taboo: Option<PathBuf>,

    /// Taboo set to apply (defaults to the deck's own taboo id)
    #[arg(long, global = true)]
    taboo_id: Option<u32>,

    /// Log level (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', global = true)]
    verbosity: Option<VerbosityArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a deck grouped by type and slot, with totals
    Parse {
        /// Deck file (.json or text)
        deck: PathBuf,

        /// Print the parsed deck as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report the first deck-building rule a deck breaks
    Validate {
        deck: PathBuf,

        /// Override the investigator's deck size
        #[arg(long)]
        deck_size: Option<u32>,
    },

    /// Show changes and experience spent between two versions of a deck
    Upgrade {
        /// Deck before the upgrade
        previous: PathBuf,
        /// Deck after the upgrade
        deck: PathBuf,
    },

    /// Shuffle a deck and draw an opening hand
    Draw {
        deck: PathBuf,

        #[arg(long, short = 'n', default_value_t = 5)]
        count: usize,

        /// Random seed (defaults to the settings seed)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Search the catalog
    Search {
        /// Name fragment (case and accent insensitive)
        name: Option<String>,

        /// Faction code, e.g. guardian (repeatable)
        #[arg(long)]
        faction: Vec<String>,

        /// Type code, e.g. asset (repeatable)
        #[arg(long = "type")]
        card_type: Vec<String>,

        /// Trait (repeatable)
        #[arg(long = "trait")]
        traits: Vec<String>,

        /// Level or level range, e.g. 0 or 1-3
        #[arg(long)]
        level: Option<String>,
    },

    /// Start a campaign and print it as JSON
    CampaignNew {
        name: String,

        /// Cycle code, e.g. core, dwl, ptc, tfa
        #[arg(long, default_value = "core")]
        cycle: String,

        /// easy, standard, hard or expert
        #[arg(long, default_value = "standard")]
        difficulty: String,

        /// Packs whose basic weaknesses form the weakness set (repeatable)
        #[arg(long = "pack")]
        packs: Vec<String>,

        /// Write the campaign here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::default(),
    };
    if cli.cards.is_some() {
        settings.catalog = cli.cards;
    }
    if cli.taboo.is_some() {
        settings.taboo = cli.taboo;
    }
    if cli.taboo_id.is_some() {
        settings.taboo_id = cli.taboo_id;
    }
    if let Some(VerbosityArg(level)) = cli.verbosity {
        settings.verbosity = level;
    }
    init_logging(settings.verbosity)?;

    match cli.command {
        Commands::Parse { deck, json } => run_parse(&settings, &deck, json),
        Commands::Validate { deck, deck_size } => run_validate(&settings, &deck, deck_size),
        Commands::Upgrade { previous, deck } => run_upgrade(&settings, &previous, &deck),
        Commands::Draw { deck, count, seed } => {
            run_draw(&settings, &deck, count, seed.unwrap_or(settings.seed))
        }
        Commands::Search {
            name,
            faction,
            card_type,
            traits,
            level,
        } => run_search(&settings, name, faction, card_type, traits, level),
        Commands::CampaignNew {
            name,
            cycle,
            difficulty,
            packs,
            output,
        } => run_campaign_new(name, cycle, &difficulty, packs, output),
    }
}

fn load_catalog(settings: &Settings) -> Result<CardDatabase> {
    CardDatabase::load(settings.require_catalog()?)
}

/// Taboo set for a deck: explicit id first, then the deck's own
fn load_taboo(settings: &Settings, deck: &Deck) -> Result<Option<TabooSet>> {
    let Some(path) = &settings.taboo else {
        return Ok(None);
    };
    match settings.taboo_id.or(deck.taboo_id) {
        Some(id) => Ok(Some(TabooLoader::load_set(path, id)?)),
        None => Ok(None),
    }
}

fn run_parse(settings: &Settings, deck_path: &Path, json: bool) -> Result<()> {
    let cards = load_catalog(settings)?;
    let deck = DeckLoader::load_from_file(deck_path)?;
    let taboo = load_taboo(settings, &deck)?;
    let options = ParseOptions {
        taboo: taboo.as_ref(),
        ..Default::default()
    };
    let parsed = parse_deck_record(&deck, &cards, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        print_parsed(&deck, &parsed, &cards);
    }
    Ok(())
}

fn print_parsed(deck: &Deck, parsed: &ParsedDeck, cards: &CardDatabase) {
    let investigator = cards
        .get_card(&deck.investigator_code)
        .map(|c| c.name.as_str())
        .unwrap_or("Unknown investigator");
    println!("=== {} ({investigator}) ===", deck.name);
    println!(
        "{} cards ({} counting toward deck size), {} XP, {} packs",
        parsed.total_card_count,
        parsed.normal_card_count,
        parsed.experience,
        parsed.pack_count()
    );

    for section in parsed.sections() {
        match section.subtitle {
            Some(subtitle) => println!("  {subtitle}"),
            None => println!("\n{}", section.title),
        }
        for entry in section.cards {
            let name = cards
                .get_card(&entry.code)
                .map(|c| c.display_name())
                .unwrap_or_default();
            println!("    {}x {name} [{}]", entry.quantity, entry.code);
        }
    }
}

fn run_validate(settings: &Settings, deck_path: &Path, deck_size: Option<u32>) -> Result<()> {
    let cards = load_catalog(settings)?;
    let deck = DeckLoader::load_from_file(deck_path)?;
    let taboo = load_taboo(settings, &deck)?;
    let investigator = cards.investigator(&deck.investigator_code)?;
    let options = ParseOptions {
        taboo: taboo.as_ref(),
        deck_size,
        ..Default::default()
    };

    match DeckValidation::new(investigator, &options).get_problem(&deck.slots, &cards) {
        Some(problem) => {
            println!("{}: {problem}", problem.reason);
            for code in &problem.invalid_cards {
                let name = cards.card(code).map(|c| c.name.as_str()).unwrap_or("?");
                println!("  {code} {name}");
            }
        }
        None => println!("OK: deck is legal"),
    }
    Ok(())
}

fn run_upgrade(settings: &Settings, previous_path: &Path, deck_path: &Path) -> Result<()> {
    let cards = load_catalog(settings)?;
    let previous = DeckLoader::load_from_file(previous_path)?;
    let deck = DeckLoader::load_from_file(deck_path)?;
    let taboo = load_taboo(settings, &deck)?;

    let changes = compute_changes(&previous.slots, &deck.slots);
    let name = |code: &CardCode| {
        cards
            .card(code)
            .map(|c| c.display_name())
            .unwrap_or_else(|| code.to_string())
    };
    for (code, count) in &changes.added {
        println!("+{count} {}", name(code));
    }
    for (code, count) in &changes.removed {
        println!("-{count} {}", name(code));
    }
    println!("Spent XP: {}", spent_xp(&changes, &cards, taboo.as_ref()));
    Ok(())
}

fn run_draw(settings: &Settings, deck_path: &Path, count: usize, seed: u64) -> Result<()> {
    let cards = load_catalog(settings)?;
    let deck = DeckLoader::load_from_file(deck_path)?;
    let mut simulator = DrawSimulator::new(&deck.slots, &cards, seed);
    let drawn = simulator.draw(count);
    info!("Drew {drawn} of {} cards (seed {seed})", simulator.deck_size());

    for code in simulator.drawn() {
        let name = cards.card(code).map(|c| c.display_name()).unwrap_or_default();
        println!("{code} {name}");
    }
    Ok(())
}

fn run_search(
    settings: &Settings,
    name: Option<String>,
    factions: Vec<String>,
    types: Vec<String>,
    traits: Vec<String>,
    level: Option<String>,
) -> Result<()> {
    let cards = load_catalog(settings)?;
    let factions = factions
        .iter()
        .map(|f| {
            Faction::from_code(f)
                .ok_or_else(|| DeckError::InvalidConfig(format!("unknown faction '{f}'")))
        })
        .collect::<Result<Vec<_>>>()?;
    let level = level.as_deref().map(parse_range).transpose()?;

    let filter = CardFilter {
        name,
        factions,
        types: types.iter().map(|t| CardType::from_code(t)).collect(),
        traits,
        level,
        ..Default::default()
    };
    let hits = filter.apply(&cards);
    info!("{}: {} cards", filter.describe(), hits.len());
    for card in hits {
        let level = card.xp.map(|xp| format!(" ({xp})")).unwrap_or_default();
        println!("{} {}{level} [{}]", card.code, card.display_name(), card.faction);
    }
    Ok(())
}

/// "3" or "1-3"
fn parse_range(s: &str) -> Result<Range> {
    let bad = || DeckError::InvalidConfig(format!("invalid range '{s}'"));
    let (min, max) = s.split_once('-').unwrap_or((s, s));
    let min = min.trim().parse().map_err(|_| bad())?;
    let max = max.trim().parse().map_err(|_| bad())?;
    Ok(Range::new(min, max))
}

fn run_campaign_new(
    name: String,
    cycle: String,
    difficulty: &str,
    packs: Vec<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let difficulty = Difficulty::from_code(difficulty)
        .ok_or_else(|| DeckError::InvalidConfig(format!("unknown difficulty '{difficulty}'")))?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut store = CampaignStore::new();
    let params = NewCampaign {
        weakness_set: WeaknessSet::new(packs.into_iter().map(PackCode::new).collect()),
        ..NewCampaign::new(name, cycle).with_difficulty(difficulty)
    };
    let campaign = store.new_campaign(params, now)?;
    let json = serde_json::to_string_pretty(campaign)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!("Wrote campaign to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
