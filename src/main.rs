//! Romacase CLI - turn Japanese text into code identifiers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use romacase::cache::{JsonCacheFile, TranslationCache};
use romacase::case::CaseVariant;
use romacase::config::Config;
use romacase::console::Console;
use romacase::dictionary::Dictionary;
use romacase::pipeline::Pipeline;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Editors tried in order when none is configured.
const FALLBACK_EDITORS: &[&str] = &["code", "nano", "vim", "vi", "notepad"];

/// Japanese text to romanized code identifiers.
#[derive(Parser, Debug)]
#[command(name = "romacase")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use this config file instead of the default one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log how each token was resolved.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print nothing but the result.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert text (or standard input) to the given case.
    Convert {
        /// snake, upper-snake, pascal, camel, kebab or japanese.
        case: CaseVariant,

        /// Text to convert. Read from standard input when omitted.
        text: Option<String>,
    },

    /// Manage the translation cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the user dictionary.
    Dict {
        #[command(subcommand)]
        action: DictAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Remove every cached translation.
    Clear,
    /// Write the cache to a JSON file.
    Export { path: PathBuf },
    /// Replace the cache with a JSON file.
    Import { path: PathBuf },
}

#[derive(Subcommand, Debug)]
enum DictAction {
    /// Show all entries.
    List,
    /// Add or replace an entry.
    Add { source: String, target: String },
    /// Remove every entry for a source text.
    Remove { source: String },
    /// Remove all entries.
    Clear,
    /// Write the dictionary to a JSON file.
    Export { path: PathBuf },
    /// Replace the dictionary with a JSON file.
    Import { path: PathBuf },
    /// Open the dictionary file in an editor.
    Edit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let console = if args.quiet {
        Console::silent()
    } else {
        Console::new().with_verbose(args.verbose)
    };

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    match args.command {
        Commands::Convert { case, text } => convert(&config, console, case, text).await,
        Commands::Cache { action } => run_cache(&config, &console, action),
        Commands::Dict { action } => run_dict(&config, &console, action),
    }
}

async fn convert(
    config: &Config,
    console: Console,
    case: CaseVariant,
    text: Option<String>,
) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read standard input")?;
            buffer
        }
    };

    let mut pipeline = Pipeline::from_config(config, console)?;
    let output = pipeline.transform(&text, case).await?;

    println!("{}", output);
    Ok(())
}

fn run_cache(config: &Config, console: &Console, action: CacheAction) -> Result<()> {
    let cache_file = config.cache_file()?;
    // loaded regardless of cache.enabled
    let mut cache = TranslationCache::load(Box::new(JsonCacheFile::new(&cache_file)), true)
        .with_context(|| format!("Failed to load cache {}", cache_file.display()))?;

    match action {
        CacheAction::Clear => {
            let count = cache.len();
            cache.clear().context("Failed to clear cache")?;
            console.success(&format!("Removed {} cached translations", count));
        }
        CacheAction::Export { path } => {
            cache
                .export_to(&path)
                .with_context(|| format!("Failed to export cache to {}", path.display()))?;
            console.success(&format!(
                "Exported {} translations to {}",
                cache.len(),
                path.display()
            ));
        }
        CacheAction::Import { path } => {
            let count = cache
                .import_from(&path)
                .with_context(|| format!("Failed to import cache from {}", path.display()))?;
            console.success(&format!("Imported {} translations", count));
        }
    }

    Ok(())
}

fn run_dict(config: &Config, console: &Console, action: DictAction) -> Result<()> {
    let dictionary_file = config.dictionary_file()?;
    let mut dictionary = Dictionary::load(&dictionary_file)
        .with_context(|| format!("Failed to load dictionary {}", dictionary_file.display()))?;

    match action {
        DictAction::List => {
            for entry in dictionary.entries() {
                println!("{}\t{}", entry.source_text, entry.transformed_romaji);
            }
            console.info(&format!("{} entries", dictionary.len()));
        }
        DictAction::Add { source, target } => {
            dictionary.add(&source, &target);
            dictionary.save().context("Failed to save dictionary")?;
            console.success(&format!("{} -> {}", console.token(&source), target));
        }
        DictAction::Remove { source } => {
            let removed = dictionary.remove(&source);
            if removed == 0 {
                console.warning(&format!("No entry for {}", console.token(&source)));
                return Ok(());
            }
            dictionary.save().context("Failed to save dictionary")?;
            console.success(&format!("Removed {} entries", removed));
        }
        DictAction::Clear => {
            dictionary.clear();
            dictionary.save().context("Failed to save dictionary")?;
            console.success("Dictionary cleared");
        }
        DictAction::Export { path } => {
            dictionary
                .export_to(&path)
                .with_context(|| format!("Failed to export dictionary to {}", path.display()))?;
            console.success(&format!(
                "Exported {} entries to {}",
                dictionary.len(),
                path.display()
            ));
        }
        DictAction::Import { path } => {
            let count = dictionary
                .import_from(&path)
                .with_context(|| format!("Failed to import dictionary from {}", path.display()))?;
            console.success(&format!("Imported {} entries", count));
        }
        DictAction::Edit => {
            if !dictionary.filepath().exists() {
                dictionary.save().context("Failed to create dictionary file")?;
            }

            let editor = find_editor(config).ok_or_else(|| {
                anyhow::anyhow!("No editor found. Set paths.editor_command in the config file")
            })?;
            console.step(&format!("Opening {} in {}", dictionary_file.display(), editor));
            open_in_editor(&editor, dictionary.filepath())?;

            if let Err(e) = dictionary.reload_from_disk() {
                console.error(&format!("Dictionary is no longer valid after editing: {}", e));
                anyhow::bail!("Fix {} and run `romacase dict edit` again", dictionary_file.display());
            }
            console.success(&format!("Dictionary has {} entries", dictionary.len()));
        }
    }

    Ok(())
}

/// Configured editor, then `$VISUAL`/`$EDITOR`, then the first fallback on PATH.
fn find_editor(config: &Config) -> Option<String> {
    if let Some(command) = config.paths.editor_command.as_ref().filter(|c| !c.trim().is_empty()) {
        return Some(command.clone());
    }

    for var in ["VISUAL", "EDITOR"] {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                return Some(value);
            }
        }
    }

    FALLBACK_EDITORS
        .iter()
        .find(|name| which::which(name).is_ok())
        .map(|name| name.to_string())
}

/// Runs `editor` (which may carry arguments) on `path` and waits for it.
fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("Editor command is empty"))?;

    let mut command = Command::new(program);
    command.args(parts);
    // VS Code returns immediately unless asked to wait
    if program == "code" && !editor.contains("--wait") {
        command.arg("--wait");
    }

    let status = command
        .arg(path)
        .status()
        .with_context(|| format!("Failed to start editor '{}'", editor))?;

    if !status.success() {
        anyhow::bail!("Editor exited with {}", status);
    }

    Ok(())
}
