use std::fmt::Display;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;

use clap::{Parser, Subcommand};
use pbank_core::core_api::{Engine, Intent, RenameTarget, Session};
use pbank_core::gender::Gender;
use pbank_core::launcher::GameLauncher;
use pbank_core::locate::{self, CustomGamePath, GamePathResolver};
use pbank_core::model::{SlotRef, TEAM_SIZE};
use pbank_core::store::{game, settings};
use pbank_render::{SectionSelection, render_json, render_text};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Game save to open instead of the configured or default location.
    #[arg(long, global = true, value_name = "GAMESAVE.JSON")]
    save: Option<PathBuf>,
    /// Bank file to use instead of the one next to the executable.
    #[arg(long = "bank-file", global = true, value_name = "PATH")]
    bank_file: Option<PathBuf>,
    /// Settings file to use instead of the one next to the executable.
    #[arg(long = "settings-file", global = true, value_name = "PATH")]
    settings_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the player, team, storage boxes and bank.
    Show {
        #[arg(long)]
        player: bool,
        #[arg(long)]
        team: bool,
        #[arg(long)]
        storage: bool,
        #[arg(long)]
        bank: bool,
        #[arg(long)]
        json: bool,
    },
    /// Rename an Elestral in a team slot, a storage entry or the bank.
    Rename {
        #[arg(value_name = "team:N|box:B:E|bank:N", value_parser = parse_rename_target)]
        target: RenameTarget,
        name: String,
    },
    /// Copy an Elestral from the team or storage into the bank.
    Export {
        #[arg(value_name = "team:N|box:B:E", value_parser = parse_slot)]
        slot: SlotRef,
    },
    /// Copy a bank entry into the first free storage slot.
    Import {
        #[arg(value_name = "BANK_INDEX", value_parser = parse_bank_index)]
        index: usize,
    },
    /// Permanently remove an entry from the bank.
    Release {
        #[arg(value_name = "BANK_INDEX", value_parser = parse_bank_index)]
        index: usize,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Set the player character's gender.
    SetGender {
        #[arg(value_name = "male|female", value_parser = parse_gender)]
        gender: Gender,
    },
    /// Copy the game save to a dated backup file.
    Backup {
        #[arg(value_name = "DEST")]
        dest: Option<PathBuf>,
    },
    /// Replace the game save with a backup.
    Restore {
        source: PathBuf,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Remember a save location for future runs.
    SetSavePath {
        path: PathBuf,
    },
    /// Print the files this tool reads and writes.
    Where,
    /// Start the game and wait for it to exit.
    Launch {
        #[arg(value_name = "GAME_EXE")]
        executable: PathBuf,
    },
}

trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    }
}

struct ToolPaths {
    bank: PathBuf,
    settings: PathBuf,
}

impl ToolPaths {
    fn from_cli(cli: &Cli) -> Self {
        let tool_dir = if cli.bank_file.is_some() && cli.settings_file.is_some() {
            None
        } else {
            Some(locate::tool_dir().unwrap_or_else(|e| fail(e)))
        };
        let beside_tool = |path: fn(&Path) -> PathBuf| {
            tool_dir
                .as_deref()
                .map(path)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        Self {
            bank: cli
                .bank_file
                .clone()
                .unwrap_or_else(|| beside_tool(locate::bank_path)),
            settings: cli
                .settings_file
                .clone()
                .unwrap_or_else(|| beside_tool(locate::settings_path)),
        }
    }

    fn save_path(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let prefs = settings::load(&self.settings).unwrap_or_else(|e| fail(e));
        locate::default_save_path(&prefs)
    }

    fn require_save_path(&self, explicit: Option<&Path>) -> PathBuf {
        self.save_path(explicit).unwrap_or_else(|| {
            eprintln!("Error: no game save found; pass --save <PATH> or run `pbank set-save-path`");
            process::exit(1);
        })
    }

    fn open_session(&self, explicit: Option<&Path>) -> Session {
        let save_path = self.require_save_path(explicit);
        Engine::new()
            .open(&save_path, &self.bank)
            .unwrap_or_else(|e| {
                eprintln!("Error opening {}:", save_path.display());
                eprintln!("  {e}");
                process::exit(1);
            })
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let paths = ToolPaths::from_cli(&cli);
    let explicit_save = cli.save.as_deref();
    debug!(
        bank = %paths.bank.display(),
        settings = %paths.settings.display(),
        "resolved tool paths"
    );

    match &cli.command {
        Command::Show {
            player,
            team,
            storage,
            bank,
            json,
        } => {
            let session = paths.open_session(explicit_save);
            let sections = SectionSelection {
                player: *player,
                team: *team,
                storage: *storage,
                bank: *bank,
            };
            let snapshot = session.snapshot();
            if *json {
                let value = render_json(&snapshot, sections);
                let text = serde_json::to_string_pretty(&value).unwrap_or_else(|e| fail(e));
                println!("{text}");
            } else {
                print!("{}", render_text(&snapshot, sections));
            }
        }
        Command::Rename { target, name } => {
            apply(
                &paths,
                explicit_save,
                Intent::Rename {
                    target: *target,
                    name: name.clone(),
                },
            );
        }
        Command::Export { slot } => apply(&paths, explicit_save, Intent::Export(*slot)),
        Command::Import { index } => apply(&paths, explicit_save, Intent::Import(*index)),
        Command::Release { index, yes } => {
            let mut session = paths.open_session(explicit_save);
            let Some(record) = session.bank().elestrals.get(*index) else {
                eprintln!("Error: there is no bank entry {}", index + 1);
                process::exit(1);
            };
            let prompt = format!(
                "Release {} permanently? This cannot be undone.",
                display_name(&record.name, &record.species)
            );
            if !confirmer(*yes).confirm(&prompt) {
                println!("Release cancelled.");
                return;
            }
            let applied = session
                .apply(Intent::Release(*index))
                .unwrap_or_else(|e| fail(e));
            println!("{}", applied.change.summary);
        }
        Command::SetGender { gender } => {
            apply(&paths, explicit_save, Intent::SetGender(*gender));
        }
        Command::Backup { dest } => {
            let save_path = paths.require_save_path(explicit_save);
            let name = game::default_backup_name(chrono::Local::now().date_naive());
            let dest = match dest {
                Some(dest) if dest.is_dir() => dest.join(name),
                Some(dest) => dest.clone(),
                None => PathBuf::from(name),
            };
            let bytes = game::backup(&save_path, &dest).unwrap_or_else(|e| fail(e));
            println!("Backup saved to {} ({bytes} bytes).", dest.display());
        }
        Command::Restore { source, yes } => {
            let save_path = paths.require_save_path(explicit_save);
            let prompt = format!(
                "Replace {} with {}? The current save will be overwritten.",
                save_path.display(),
                source.display()
            );
            if !confirmer(*yes).confirm(&prompt) {
                println!("Restore cancelled.");
                return;
            }
            game::restore(source, &save_path).unwrap_or_else(|e| fail(e));
            println!("Save restored from {}.", source.display());
        }
        Command::SetSavePath { path } => {
            game::load(path).unwrap_or_else(|e| {
                eprintln!("Error: {} is not a usable game save:", path.display());
                eprintln!("  {e}");
                process::exit(1);
            });
            // Stored absolute so later runs resolve it from any directory.
            let path = fs::canonicalize(path).unwrap_or_else(|e| {
                eprintln!("Error resolving {}: {e}", path.display());
                process::exit(1);
            });
            let mut prefs = settings::load(&paths.settings).unwrap_or_else(|e| fail(e));
            prefs.custom_save_path = path.to_string_lossy().into_owned();
            settings::save(&paths.settings, &prefs).unwrap_or_else(|e| fail(e));
            println!("Save path set to {}.", path.display());
        }
        Command::Where => {
            println!("bank={}", paths.bank.display());
            println!("settings={}", paths.settings.display());
            match paths.save_path(explicit_save) {
                Some(path) => println!("save={}", path.display()),
                None => println!("save=not found"),
            }
        }
        Command::Launch { executable } => launch(executable),
    }
}

fn apply(paths: &ToolPaths, explicit_save: Option<&Path>, intent: Intent) {
    let mut session = paths.open_session(explicit_save);
    let applied = session.apply(intent).unwrap_or_else(|e| fail(e));
    println!("{}", applied.change.summary);
}

fn launch(executable: &Path) {
    let resolver = CustomGamePath(Some(executable.to_path_buf()));
    let Some(executable) = resolver.resolve() else {
        eprintln!("Error: game executable not found: {}", executable.display());
        process::exit(1);
    };

    let launcher = GameLauncher::new();
    let (tx, rx) = mpsc::channel();
    launcher
        .launch(&executable, move |status| {
            let _ = tx.send(status);
        })
        .unwrap_or_else(|e| fail(e));
    println!("Launched {}; waiting for the game to exit.", executable.display());

    match rx.recv() {
        Ok(Ok(status)) => println!("Game exited ({status})."),
        Ok(Err(e)) => fail(e),
        Err(_) => fail("lost track of the game process"),
    }
}

fn fail(e: impl Display) -> ! {
    eprintln!("Error: {e}");
    process::exit(1);
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).compact().with_writer(io::stderr))
        .init();
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    Gender::parse(raw.trim()).ok_or_else(|| format!("expected male or female, got `{raw}`"))
}

fn display_name<'a>(name: &'a str, species: &'a str) -> &'a str {
    if name.is_empty() { species } else { name }
}

fn parse_position(raw: &str, what: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("{what} must be a number starting at 1, got `{raw}`")),
    }
}

fn parse_bank_index(raw: &str) -> Result<usize, String> {
    parse_position(raw, "bank index")
}

fn parse_slot(raw: &str) -> Result<SlotRef, String> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    match parts.as_slice() {
        [kind, n] if kind.eq_ignore_ascii_case("team") => {
            let index = parse_position(n, "team slot")?;
            if index >= TEAM_SIZE {
                return Err(format!("team slot must be between 1 and {TEAM_SIZE}"));
            }
            Ok(SlotRef::Team(index))
        }
        [kind, b, e] if kind.eq_ignore_ascii_case("box") => Ok(SlotRef::Storage {
            box_index: parse_position(b, "box number")?,
            entry_index: parse_position(e, "box entry")?,
        }),
        _ => Err(format!("expected team:N or box:B:E, got `{raw}`")),
    }
}

fn parse_rename_target(raw: &str) -> Result<RenameTarget, String> {
    match raw.trim().split_once(':') {
        Some((kind, n)) if kind.eq_ignore_ascii_case("bank") => {
            parse_bank_index(n).map(RenameTarget::Bank)
        }
        _ => parse_slot(raw).map(RenameTarget::Slot),
    }
}
