//! aura - chord symbol interpreter
//!
//! Subcommands:
//! - `aura parse <CHORD>` - resolve one chord symbol into intervals
//! - `aura compare` - compare the engine with the reference lookup
//! - `aura rules` - list the active modifier rules

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

use aura::{
    compare_all, parse_symbol, split_slash, to_json, write_csv, AuraError, Config, ConsoleTracer,
    Fixtures, Outcome, SlashChord, Summary,
};
use aura_core::{ChordEngine, ChordResult};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aura")]
#[command(about = "Interpret chord symbols as interval structures")]
#[command(version)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// YAML rule table replacing the built-in one
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Separator between semitone values
    #[arg(long, global = true)]
    separator: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a chord symbol (e.g. Cm7b5, Gsus4add9, Cmaj7/E)
    Parse {
        chord: String,

        /// Show every step of the parse
        #[arg(long)]
        trace: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the engine with the reference lookup over the fixture chords
    Compare {
        /// Write the rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the active modifier rules
    Rules,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AuraError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .merge(cli.separator, cli.rules, cli.no_color);

    let engine = config.engine()?;
    debug!(rules = engine.table().len(), "engine ready");

    match cli.command {
        Commands::Parse { chord, trace, json } => {
            parse_command(&engine, &chord, trace, json, config.color())
        }
        Commands::Compare { csv, json } => compare_command(&engine, csv, json, config.color()),
        Commands::Rules => rules_command(&engine),
    }
}

fn parse_command(
    engine: &ChordEngine,
    chord: &str,
    trace: bool,
    json: bool,
    color: bool,
) -> Result<(), AuraError> {
    let parsed = if trace {
        let (head, bass) = split_slash(chord)?;
        let mut tracer = ConsoleTracer::new(color);
        let result = engine.parse_with_observer(head, &mut tracer);
        for line in tracer.lines() {
            eprintln!("{}", line);
        }
        SlashChord {
            chord: result?,
            bass: bass.map(str::to_string),
        }
    } else {
        parse_symbol(engine, chord)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.chord)?);
        return Ok(());
    }

    print_chord(&parsed.chord, parsed.bass.as_deref(), color);
    Ok(())
}

fn print_chord(chord: &ChordResult, bass: Option<&str>, color: bool) {
    let title = match bass {
        Some(bass) => format!("{} (bass {})", chord.input, bass),
        None => chord.input.clone(),
    };
    if color {
        println!("{}", title.bold());
    } else {
        println!("{}", title);
    }
    println!("  root       {}", chord.root);
    println!("  modifiers  {}", chord.modifiers.join(" "));
    println!("  semitones  {}", chord.formatted.display);
    println!("  intervals  {}", chord.formatted.names.join(" "));
    let roles: Vec<String> = chord.intervals.iter().map(|(r, v)| format!("{}={}", r, v)).collect();
    println!("  roles      {}", roles.join(" "));
}

fn compare_command(
    engine: &ChordEngine,
    csv: Option<PathBuf>,
    json: bool,
    color: bool,
) -> Result<(), AuraError> {
    let fixtures = Fixtures::builtin()?;
    let rows = compare_all(engine, fixtures.all());

    if let Some(path) = csv {
        let file = File::create(&path).map_err(|source| AuraError::Io {
            path: path.clone(),
            source,
        })?;
        write_csv(&rows, BufWriter::new(file))?;
        eprintln!("Wrote {} rows to {}", rows.len(), path.display());
    }

    if json {
        println!("{}", to_json(&rows)?);
        return Ok(());
    }

    let show = |semitones: &Option<Vec<i32>>| match semitones {
        Some(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(engine.separator()),
        None => "-".to_string(),
    };

    println!("{:<14} {:<22} {:<22} outcome", "chord", "engine", "reference");
    for row in &rows {
        let outcome = row.outcome.name();
        let outcome = match (color, row.outcome) {
            (false, _) => outcome.to_string(),
            (true, Outcome::Match) => outcome.green().to_string(),
            (true, Outcome::Mismatch) => outcome.red().to_string(),
            (true, _) => outcome.yellow().to_string(),
        };
        println!(
            "{:<14} {:<22} {:<22} {}",
            row.chord,
            show(&row.engine),
            show(&row.reference),
            outcome
        );
    }
    println!();
    println!("{}", Summary::from_rows(&rows));
    Ok(())
}

fn rules_command(engine: &ChordEngine) -> Result<(), AuraError> {
    for rule in engine.table().rules() {
        let operations: Vec<String> = rule.operations.iter().map(|op| op.to_string()).collect();
        let mut line = format!(
            "{:<11} p{} {:<22} {}",
            rule.category.name(),
            rule.priority,
            rule.symbols.join("|"),
            operations.join(", ")
        );
        if !rule.requires.is_empty() {
            let requires: Vec<String> = rule.requires.iter().map(|r| r.to_string()).collect();
            line.push_str(&format!("  requires {}", requires.join(", ")));
        }
        if !rule.excludes.is_empty() {
            let excludes: Vec<String> = rule.excludes.iter().map(|c| c.to_string()).collect();
            line.push_str(&format!("  excludes {}", excludes.join(", ")));
        }
        if rule.is_default {
            line.push_str("  (default)");
        }
        println!("{}", line);
    }
    Ok(())
}
