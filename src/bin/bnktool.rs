//! bnktool
//!
//! List, extract, replace and empty the audio items of a sound bank.
//!
//! Item names may be given as `[list.txt]` to read them from a file:
//!
//! ```text
//! bnktool sb.bnk -l
//! bnktool AMB_GenericVillage.bnk -u [list.txt]
//! ```

use anyhow::{Context, Result};
use bnk::{
    expand_item_list, item_id, parse_item_id, payload_file_name, BankConfig, BankFile,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "bnktool")]
#[command(about = "Sound bank tool: list, extract, update or empty audio items")]
struct Args {
    /// Bank file to process (*.bnk)
    bank: PathBuf,

    /// List the items contained in the bank
    #[arg(short = 'l', long)]
    list: bool,

    /// Extract one or several items (no argument = extract all)
    #[arg(short = 'x', long, num_args = 0..)]
    extract: Option<Vec<String>>,

    /// Replace or add one or several items from payload files
    #[arg(short = 'u', long, num_args = 1..)]
    update: Vec<String>,

    /// Replace one or several items with empty content
    #[arg(short = 'e', long, num_args = 1..)]
    empty: Vec<String>,

    /// Directory extracted payloads are written to
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// TOML config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn print_list(file: &BankFile, verbose: bool, extension: &str) {
    let items = file.list();
    if verbose {
        println!("{} audio items", items.len());
    }
    for (id, length) in items {
        let name = payload_file_name(id, extension);
        if verbose {
            println!("{} : {} bytes", name, length);
        } else {
            println!("{}", name);
        }
    }
}

/// Expand `[list]` arguments one at a time; an unreadable list counts as a
/// failure and the remaining names are still processed
fn expand_names(names: &[String], failures: &mut usize) -> Vec<String> {
    let mut expanded = Vec::with_capacity(names.len());
    for name in names {
        match expand_item_list(std::slice::from_ref(name)) {
            Ok(list) => expanded.extend(list),
            Err(err) => {
                warn!("skipping {}: {}", name, err);
                *failures += 1;
            }
        }
    }
    expanded
}

/// Returns the number of items that could not be extracted
fn extract(file: &BankFile, names: &[String], output_dir: &Path, extension: &str) -> Result<usize> {
    let mut failures = 0;
    let ids: Vec<String> = if names.is_empty() {
        file.list().into_iter().map(|(id, _)| id.to_string()).collect()
    } else {
        expand_names(names, &mut failures)
            .iter()
            .map(|n| item_id(n))
            .collect()
    };

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory {:?}", output_dir))?;

    for id in ids {
        let target = output_dir.join(payload_file_name(&id, extension));
        let written = file
            .extract(&id)
            .map_err(anyhow::Error::from)
            .and_then(|payload| {
                info!(".. extracting {}", target.display());
                std::fs::write(&target, payload)
                    .with_context(|| format!("cannot write {:?}", target))
            });
        if let Err(err) = written {
            warn!("skipping {}: {:#}", id, err);
            failures += 1;
        }
    }
    Ok(failures)
}

fn update(file: &mut BankFile, names: &[String]) -> usize {
    let mut failures = 0;
    for name in expand_names(names, &mut failures) {
        info!(".. updating {}", name);
        let id = item_id(&name);
        // checked here so one bad name cannot fail the save of the batch
        if let Err(err) = parse_item_id(&id) {
            warn!("skipping {}: {}", name, err);
            failures += 1;
            continue;
        }
        match std::fs::read(&name) {
            Ok(payload) => file.update(&id, payload),
            Err(err) => {
                warn!("skipping {}: {}", name, err);
                failures += 1;
            }
        }
    }
    failures
}

fn empty(file: &mut BankFile, names: &[String]) -> usize {
    let mut failures = 0;
    for name in expand_names(names, &mut failures) {
        info!(".. emptying {}", name);
        if let Err(err) = file.empty(&item_id(&name)) {
            warn!("skipping {}: {}", name, err);
            failures += 1;
        }
    }
    failures
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => BankConfig::load(path)
            .with_context(|| format!("cannot load config {:?}", path))?,
        None => BankConfig::default(),
    };
    let extension = config.payload_extension.clone();

    let mut file = BankFile::open(&args.bank, config)
        .with_context(|| format!("cannot open bank {:?}", args.bank))?;
    if args.verbose {
        println!("Sound bank version {}", file.version());
    }

    let mut failures = 0;
    if args.list {
        print_list(&file, args.verbose, &extension);
    }
    if let Some(names) = &args.extract {
        failures += extract(&file, names, &args.output_dir, &extension)?;
    }
    if !args.update.is_empty() {
        failures += update(&mut file, &args.update);
    }
    if !args.empty.is_empty() {
        failures += empty(&mut file, &args.empty);
    }

    if let Some(backup) = file
        .close()
        .with_context(|| format!("cannot save bank {:?}", args.bank))?
    {
        info!("original saved as {}", backup.display());
    }

    if failures > 0 {
        anyhow::bail!("{} item(s) could not be processed", failures);
    }
    Ok(())
}
