use clap::{Args, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::{Result, eyre};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weaponstore::config::{Backend, Config};
use weaponstore::seed::{DEFAULT_ADDITIONAL_EFFECT, DEFAULT_BASIC_EFFECT, DEFAULT_SKILL};
use weaponstore::{
    CompletionFilter, FilterCriteria, Inventory, InventoryError, NewWeapon, OwnershipFilter, Rarity, Stats, Storage,
    Weapon, WeaponType,
};

#[derive(Parser)]
#[command(name = "weaponstore")]
#[command(about = "WeaponStore CLI - Track owned and optimized weapons")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Config file (default: ~/.config/weaponstore/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the inventory (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Storage backend (overrides config)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List weapons matching the filters, newest first
    List(FilterArgs),

    /// Show statistics for weapons matching the filters
    Stats(FilterArgs),

    /// Register a new weapon
    Add(AddArgs),

    /// Flip the owned flag of a weapon
    ToggleOwned { id: String },

    /// Flip the optimized flag of a weapon
    ToggleOptimized { id: String },

    /// Delete weapons by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Confirm the deletion (there is no undo)
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive substring of the name
    #[arg(short, long, default_value = "")]
    search: String,

    /// Allowed rarity (repeatable)
    #[arg(long)]
    rarity: Vec<Rarity>,

    /// Allowed weapon type (repeatable)
    #[arg(long = "type")]
    weapon_type: Vec<WeaponType>,

    #[arg(long)]
    basic_effect: Vec<String>,

    #[arg(long)]
    additional_effect: Vec<String>,

    #[arg(long)]
    skill: Vec<String>,

    /// any, completed or pending
    #[arg(long, default_value = "any")]
    status: CompletionFilter,

    /// any, owned or not-owned
    #[arg(long, default_value = "any")]
    possession: OwnershipFilter,
}

impl FilterArgs {
    fn criteria(self) -> FilterCriteria {
        FilterCriteria {
            search: self.search,
            rarities: self.rarity.into_iter().collect(),
            types: self.weapon_type.into_iter().collect(),
            basic_effects: self.basic_effect.into_iter().collect(),
            additional_effects: self.additional_effect.into_iter().collect(),
            skills: self.skill.into_iter().collect(),
            completion: self.status,
            ownership: self.possession,
        }
    }
}

#[derive(Args)]
struct AddArgs {
    #[arg(short, long)]
    name: String,

    #[arg(short, long, default_value = "6")]
    rarity: Rarity,

    #[arg(short = 't', long = "type", default_value = "sword1h")]
    weapon_type: WeaponType,

    #[arg(long, default_value = DEFAULT_BASIC_EFFECT)]
    basic_effect: String,

    #[arg(long, default_value = DEFAULT_ADDITIONAL_EFFECT)]
    additional_effect: String,

    #[arg(long, default_value = DEFAULT_SKILL)]
    skill: String,

    /// Register as not owned
    #[arg(long)]
    not_owned: bool,

    /// Register with optimization finished
    #[arg(long)]
    optimized: bool,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    // Open inventory
    let storage = config.open_storage()?;
    let mut inventory = Inventory::open_with_key(storage, config.storage_key.clone());

    match cli.command {
        Commands::List(filter) => {
            let view = inventory.view(&filter.criteria());
            for weapon in &view.weapons {
                println!("{}", format_weapon(weapon));
            }
            println!();
            print_stats(&view.stats, view.total_registered);
        }
        Commands::Stats(filter) => {
            let criteria = filter.criteria();
            print_stats(&inventory.stats(&criteria), inventory.total_registered());
        }
        Commands::Add(args) => {
            if args.name.trim().is_empty() {
                return Err(eyre!("Weapon name cannot be empty"));
            }
            let weapon = inventory.add(NewWeapon {
                name: args.name,
                rarity: args.rarity,
                weapon_type: args.weapon_type,
                basic_effect: args.basic_effect,
                additional_effect: args.additional_effect,
                skill: args.skill,
                optimized: args.optimized,
                owned: !args.not_owned,
            })?;
            println!("Added {}", format_weapon(weapon));
        }
        Commands::ToggleOwned { id } => {
            if inventory.toggle_owned(&id)? {
                print_toggled(&inventory, &id);
            } else {
                println!("No weapon with id {}", id);
            }
        }
        Commands::ToggleOptimized { id } => {
            if inventory.toggle_optimized(&id)? {
                print_toggled(&inventory, &id);
            } else {
                println!("No weapon with id {}", id);
            }
        }
        Commands::Delete { ids, yes } => {
            delete(&mut inventory, &ids, yes)?;
        }
    }

    // Surface a write that failed during load
    if inventory.is_dirty() {
        inventory.flush()?;
    }

    Ok(())
}

fn delete<S: Storage>(inventory: &mut Inventory<S>, ids: &[String], yes: bool) -> Result<()> {
    inventory.enter_selection_mode();
    for id in ids {
        if inventory.get(id).is_some() {
            inventory.toggle_selected(id);
        } else {
            eprintln!("{} no weapon with id {}", "warning:".yellow(), id);
        }
    }

    match inventory.request_delete() {
        Ok(()) => {}
        Err(InventoryError::EmptySelection) => {
            inventory.exit_selection_mode();
            return Err(eyre!("No matching weapons to delete"));
        }
        Err(e) => return Err(e.into()),
    }

    if !yes {
        println!("Would delete:");
        for weapon in inventory.weapons() {
            if inventory.selection().is_selected(&weapon.id) {
                println!("  {}", format_weapon(weapon));
            }
        }
        println!("Re-run with --yes to confirm (there is no undo)");
        inventory.exit_selection_mode();
        return Ok(());
    }

    let removed = inventory.confirm_delete()?;
    println!("Deleted {} weapon(s)", removed);
    Ok(())
}

fn print_toggled<S: Storage>(inventory: &Inventory<S>, id: &str) {
    if let Some(weapon) = inventory.get(id) {
        println!("{}", format_weapon(weapon));
    }
}

fn rarity_colored(rarity: Rarity) -> ColoredString {
    let label = rarity.to_string();
    match rarity {
        Rarity::Six => label.truecolor(251, 146, 60),
        Rarity::Five => label.truecolor(250, 204, 21),
        Rarity::Four => label.truecolor(192, 132, 252),
    }
}

fn format_weapon(weapon: &Weapon) -> String {
    let owned = if weapon.owned { "所持".blue() } else { "未所持".dimmed() };
    let status = if weapon.optimized { "〇".green() } else { "✖".red() };
    let created = chrono::DateTime::from_timestamp_millis(weapon.created_at)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    format!(
        "{} {} {} [{}] {}/{}/{} {} {} {}",
        weapon.id.dimmed(),
        rarity_colored(weapon.rarity),
        weapon.name.bold(),
        weapon.weapon_type,
        weapon.basic_effect,
        weapon.additional_effect,
        weapon.skill,
        owned,
        status,
        created.dimmed(),
    )
}

fn print_stats(stats: &Stats, total_registered: usize) {
    println!(
        "{} {} / {} registered",
        "Visible:".bold(),
        stats.total,
        total_registered
    );
    println!(
        "{} {} ({}%)   {} {} ({}%)",
        "Owned:".bold(),
        stats.owned_count,
        stats.ownership_rate,
        "Optimized:".bold(),
        stats.completed_count,
        stats.optimization_rate
    );
}
