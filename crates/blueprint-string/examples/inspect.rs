//! Simple decoder to inspect blueprint strings.
//!
//! Run with: `cargo run -p blueprint-string --example inspect -- <STRING|@FILE>`
//! (reads stdin when no input is given)

use std::io::Read;

use blueprint_string::{
    Blueprint, BlueprintFolder, BlueprintOrFolder, DecodeOptions, Entity,
    parse_blueprint_or_folder_with_options,
};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Decode a blueprint or folder string and print its contents")]
struct Args {
    /// Encoded string, or `@path` to read it from a file
    input: Option<String>,

    /// Accept whatever the game's own reader accepts
    #[arg(long)]
    lenient: bool,

    /// Print every entity's components
    #[arg(long)]
    entities: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_input(input: Option<&str>) -> std::io::Result<String> {
    match input {
        Some(path) if path.starts_with('@') => std::fs::read_to_string(&path[1..]),
        Some(text) => Ok(text.to_string()),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn format_counts(counts: &rustc_hash::FxHashMap<String, u32>) -> String {
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort();
    sorted
        .iter()
        .map(|(name, count)| format!("{}x {}", count, name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_entity(index: usize, entity: &Entity, indent: &str) {
    println!("{}  [{}] {}", indent, index, entity.prototype().unwrap_or("<no prototype>"));
    let mut ints: Vec<_> = entity.integers.iter().collect();
    ints.sort();
    for (key, value) in ints {
        println!("{}      {} = {}", indent, key, value);
    }
    for (key, value) in &entity.booleans {
        println!("{}      {} = {}", indent, key, value);
    }
    for (key, value) in &entity.string_lists {
        println!("{}      {} = {:?}", indent, key, value);
    }
    for (key, value) in &entity.byte_arrays {
        println!("{}      {} = BYTES[{}]", indent, key, value.len());
    }
}

fn print_blueprint(bp: &Blueprint, indent: &str, show_entities: bool) {
    println!("{}Blueprint \"{}\" (game {}, save {})", indent, bp.name, bp.game_version, bp.save_version);
    if let Some(description) = bp.description() {
        println!("{}  {}", indent, description);
    }
    println!("{}  {} entities: {}", indent, bp.entities.len(), format_counts(&bp.component_counts));
    if show_entities {
        for (i, entity) in bp.entities.iter().enumerate() {
            print_entity(i, entity, indent);
        }
    }
}

fn print_folder(folder: &BlueprintFolder, indent: &str, show_entities: bool) {
    println!("{}Folder \"{}\"", indent, folder.name);
    if let Some(description) = folder.description() {
        println!("{}  {}", indent, description);
    }
    let child_indent = format!("{}  ", indent);
    for child in &folder.folders {
        print_folder(child, &child_indent, show_entities);
    }
    for bp in &folder.blueprints {
        print_blueprint(bp, &child_indent, show_entities);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        1 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let text = read_input(args.input.as_deref())?;
    let options = if args.lenient {
        DecodeOptions::lenient()
    } else {
        DecodeOptions::default()
    };

    let decoded = match parse_blueprint_or_folder_with_options(text.trim(), options) {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("{} ({})", err, err.code().code());
            std::process::exit(1);
        }
    };

    match &decoded {
        BlueprintOrFolder::Blueprint(bp) => print_blueprint(bp, "", args.entities),
        BlueprintOrFolder::Folder(folder) => {
            print_folder(folder, "", args.entities);
            println!("\nTotal: {}", format_counts(&folder.total_component_counts()));
        }
    }

    Ok(())
}
