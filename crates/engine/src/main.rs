//! Sheetwright - command-line entry point.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use sheetwright_domain::{
    ArcaneRecoveryOutcome, CharacterClass, CharacterId, LedgerOutcome, LevelUpOutcome,
    LevelUpRequest, ProgressionChange, RestOutcome, RestType, SlotPoolRef,
};
use sheetwright_engine::infrastructure::config::EngineConfig;
use sheetwright_engine::use_cases::{LedgerTarget, ProgressionUseCases, SheetView};
use sheetwright_engine::App;

#[derive(Parser)]
#[command(author, version, about = "Character progression for tabletop character sheets.")]
struct Cli {
    /// Print the resulting sheet as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a level 1 character.
    Create {
        name: String,
        /// Class name, e.g. Magicien or Rôdeur.
        #[arg(long)]
        class: Option<String>,
        /// Ability data as JSON.
        #[arg(long, value_name = "JSON", default_value = "{}")]
        abilities: String,
    },
    /// List stored characters.
    List,
    /// Show a character sheet.
    Show { id: String },
    /// Recompute slot maxima and class resources.
    Resolve { id: String },
    /// Spend a class resource or spell slot (`ki_points`, `slot3`, ...).
    Consume {
        id: String,
        target: String,
        #[arg(default_value_t = 1)]
        amount: u32,
    },
    /// Give back a class resource or spell slot.
    Recover {
        id: String,
        target: String,
        #[arg(default_value_t = 1)]
        amount: u32,
    },
    /// Magicien arcane recovery: restore one expended slot.
    ArcaneRecovery { id: String, spell_level: u8 },
    /// Advance one level.
    LevelUp {
        id: String,
        hp_gain: i32,
        #[arg(long)]
        subclass: Option<String>,
    },
    /// Take a short or long rest.
    Rest { id: String, kind: String },
    /// Spend a hit die during a short rest.
    HitDie { id: String, roll: u8 },
    /// Change class; omit the class to clear it.
    Class { id: String, class: Option<String> },
    /// Set the level directly (clamped to 1-20).
    Level {
        id: String,
        #[arg(allow_negative_numbers = true)]
        level: i64,
    },
    /// Replace ability data.
    Abilities { id: String, data: String },
    /// List the subclasses offered to a class.
    Subclasses { class: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from repo root when run through cargo.
    load_dotenv_from_repo_root();

    let config = EngineConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let app = App::from_config(&config);
    run(&app.use_cases.progression, cli).await
}

async fn run(progression: &ProgressionUseCases, cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Create {
            name,
            class,
            abilities,
        } => {
            let class = parse_class(class.as_deref())?;
            let abilities = parse_json(&abilities)?;
            let character = progression.create(&name, class, abilities).await?;
            print_sheet(&SheetView::from(&character), json)?;
        }
        Commands::List => {
            for character in progression.list().await? {
                let view = SheetView::from(&character);
                println!(
                    "{}  {}  {} niv. {}",
                    view.id,
                    view.name,
                    view.class.as_deref().unwrap_or("-"),
                    view.level
                );
            }
        }
        Commands::Show { id } => {
            let character = progression.show(parse_id(&id)?).await?;
            print_sheet(&SheetView::from(&character), json)?;
        }
        Commands::Resolve { id } => {
            let applied = progression.resolve(parse_id(&id)?).await?;
            if !applied.outcome {
                note(json, "Already up to date.".to_string());
            }
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::Consume { id, target, amount } => {
            let target: LedgerTarget = target.parse()?;
            let applied = progression.consume(parse_id(&id)?, target, amount).await?;
            note(json, describe_ledger(&applied.outcome));
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::Recover { id, target, amount } => {
            let target: LedgerTarget = target.parse()?;
            let applied = progression.recover(parse_id(&id)?, target, amount).await?;
            note(json, describe_ledger(&applied.outcome));
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::ArcaneRecovery { id, spell_level } => {
            let applied = progression
                .exchange_arcane_recovery(parse_id(&id)?, spell_level)
                .await?;
            note(json, describe_arcane_recovery(&applied.outcome));
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::LevelUp {
            id,
            hp_gain,
            subclass,
        } => {
            let mut request = LevelUpRequest::new(hp_gain);
            if let Some(subclass) = subclass {
                request = request.with_subclass(subclass);
            }
            let applied = progression.level_up(parse_id(&id)?, request).await?;
            note(json, describe_level_up(&applied.outcome));
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::Rest { id, kind } => {
            let rest: RestType = kind.parse()?;
            let applied = progression.rest(parse_id(&id)?, rest).await?;
            note(json, describe_rest(&applied.outcome));
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::HitDie { id, roll } => {
            let applied = progression.spend_hit_die(parse_id(&id)?, roll).await?;
            note(
                json,
                format!(
                    "Rolled {}: healed {} HP, {} hit dice left",
                    applied.outcome.roll, applied.outcome.healed, applied.outcome.remaining
                ),
            );
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::Class { id, class } => {
            let class = parse_class(class.as_deref())?;
            let applied = progression.change_class(parse_id(&id)?, class).await?;
            note(json, describe_change(&applied.outcome));
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::Level { id, level } => {
            let applied = progression.set_level(parse_id(&id)?, level).await?;
            note(json, describe_change(&applied.outcome));
            print_sheet(&SheetView::from(&applied.character), json)?;
        }
        Commands::Abilities { id, data } => {
            let abilities = parse_json(&data)?;
            let character = progression.set_abilities(parse_id(&id)?, abilities).await?;
            print_sheet(&SheetView::from(&character), json)?;
        }
        Commands::Subclasses { class } => {
            let class: CharacterClass = class.parse()?;
            for option in progression.subclass_options(class) {
                println!("{}", option);
            }
        }
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<CharacterId> {
    let uuid = Uuid::parse_str(raw.trim())
        .with_context(|| format!("'{}' is not a character id", raw))?;
    Ok(CharacterId::from(uuid))
}

fn parse_class(raw: Option<&str>) -> Result<Option<CharacterClass>> {
    raw.map(|name| name.parse::<CharacterClass>())
        .transpose()
        .context("unknown class")
}

fn parse_json(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("ability data must be valid JSON")
}

fn describe_ledger(outcome: &LedgerOutcome) -> String {
    match outcome {
        LedgerOutcome::Resource {
            resource,
            used,
            max,
        } => format!("{}: {}/{} used", resource, used, max),
        LedgerOutcome::Slot {
            pool: SlotPoolRef::Pact,
            used,
            max,
        } => format!("Pact slots: {}/{} used", used, max),
        LedgerOutcome::Slot {
            pool: SlotPoolRef::Leveled(level),
            used,
            max,
        } => format!("Level {} slots: {}/{} used", level, used, max),
    }
}

fn describe_arcane_recovery(outcome: &ArcaneRecoveryOutcome) -> String {
    format!(
        "Recovered a level {} slot ({} spent, {} left{})",
        outcome.spell_level,
        outcome.budget_spent,
        outcome.budget_remaining,
        if outcome.exhausted { ", used up" } else { "" }
    )
}

fn describe_level_up(outcome: &LevelUpOutcome) -> String {
    let mut line = format!(
        "Level {} -> {} (+{} HP)",
        outcome.from, outcome.to, outcome.hp_gain
    );
    if let Some(subclass) = &outcome.subclass_chosen {
        line.push_str(&format!(", subclass {}", subclass));
    }
    line
}

fn describe_rest(outcome: &RestOutcome) -> String {
    match outcome.rest {
        RestType::Short => "Short rest taken".to_string(),
        RestType::Long => format!(
            "Long rest taken (+{} HP, {} hit dice recovered)",
            outcome.hp_restored, outcome.hit_dice_recovered
        ),
    }
}

fn describe_change(change: &ProgressionChange) -> String {
    let cleared = |subclass: &Option<String>| {
        subclass
            .as_ref()
            .map(|s| format!(" (subclass {} cleared)", s))
            .unwrap_or_default()
    };
    match change {
        ProgressionChange::ClassChanged {
            from,
            to,
            subclass_cleared,
        } => format!(
            "Class {} -> {}{}",
            class_label(*from),
            class_label(*to),
            cleared(subclass_cleared)
        ),
        ProgressionChange::LevelSet {
            from,
            to,
            subclass_cleared,
        } => format!("Level {} -> {}{}", from, to, cleared(subclass_cleared)),
        ProgressionChange::Unchanged => "Nothing changed".to_string(),
    }
}

fn class_label(class: Option<CharacterClass>) -> String {
    class.map_or_else(|| "-".to_string(), |c| c.to_string())
}

/// Human-readable summary line, suppressed in JSON mode.
fn note(json: bool, line: String) {
    if !json {
        println!("{}", line);
    }
}

fn print_sheet(view: &SheetView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!(
        "{} ({}) - {} niv. {}",
        view.name,
        view.id,
        view.class.as_deref().unwrap_or("sans classe"),
        view.level
    );
    if let Some(subclass) = &view.subclass {
        println!("  Sous-classe: {}", subclass);
    }
    println!(
        "  PV {}/{}  DV {}/{} used",
        view.current_hp, view.max_hp, view.hit_dice_used, view.hit_dice_total
    );
    for level in view.spell_slots.slot_levels() {
        if let Some(pool) = view.spell_slots.pool(level) {
            println!("  Slots {}: {}/{} used", level, pool.used(), pool.max());
        }
    }
    if let Some(pact) = view.spell_slots.pact() {
        println!(
            "  Pact slots (level {}): {}/{} used",
            pact.slot_level(),
            pact.used(),
            pact.slots()
        );
    }
    for resource in &view.resources {
        println!("  {}: {}/{} used", resource.key, resource.used, resource.max);
    }
    if let Some(dice) = &view.sneak_attack {
        println!("  sneak_attack: {}", dice);
    }
    if let Some(recovery) = &view.arcane_recovery {
        println!(
            "  arcane_recovery: {}/{} levels{}",
            recovery.levels_recovered,
            recovery.budget,
            if recovery.used { " (used)" } else { "" }
        );
    }
    if let Some(knowledge) = &view.spell_knowledge {
        match knowledge.cantrips {
            Some(cantrips) => println!(
                "  {}: {} (+{} cantrips)",
                knowledge.label, knowledge.prepared, cantrips
            ),
            None => println!("  {}: {}", knowledge.label, knowledge.prepared),
        }
        println!("    {}", knowledge.note);
    }
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
