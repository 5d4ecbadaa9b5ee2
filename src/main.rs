use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use speakerfix::{
    execute_reconcile, execute_render, read_roster_file, resolve, ChangeCounts, MatchKind,
    ReconcileConfig, ReconcileError, ReconcileResult, RenderConfig, RosterConfig, RosterIndex,
    TrsDocument,
};

#[derive(Parser)]
#[command(name = "speakerfix")]
#[command(author, version, about = "Reconcile speaker names and accents against a roster", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite speaker names and accents and save a corrected copy
    Reconcile {
        /// Transcription document (TRS/XML) to correct
        #[arg(short, long)]
        path: PathBuf,

        /// Roster CSV with 'name', 'correct name' and optional 'accent' columns
        #[arg(short, long)]
        csv: PathBuf,

        /// Output file (defaults to the input path with the suffix inserted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suffix inserted before the extension of the output file
        #[arg(long, default_value = "_zuzenduta")]
        suffix: String,

        /// Roster CSV field delimiter
        #[arg(long, default_value = ";")]
        delimiter: char,

        /// Uppercase all speaker names before resolving them
        #[arg(long)]
        uppercase_first: bool,

        /// Write a JSON change report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show what would change without writing anything
    Analyze {
        /// Transcription document (TRS/XML) to inspect
        #[arg(short, long)]
        path: PathBuf,

        /// Roster CSV with 'name', 'correct name' and optional 'accent' columns
        #[arg(short, long)]
        csv: PathBuf,

        /// Roster CSV field delimiter
        #[arg(long, default_value = ";")]
        delimiter: char,

        /// Uppercase all speaker names before resolving them
        #[arg(long)]
        uppercase_first: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconcile {
            path,
            csv,
            output,
            suffix,
            delimiter,
            uppercase_first,
            report,
            verbose,
        } => {
            setup_logging(verbose);
            reconcile_document(
                &path,
                &csv,
                output.as_deref(),
                report.as_deref(),
                roster_config(delimiter)?,
                ReconcileConfig { uppercase_first },
                RenderConfig { suffix },
            )
        }
        Commands::Analyze {
            path,
            csv,
            delimiter,
            uppercase_first,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_document(
                &path,
                &csv,
                roster_config(delimiter)?,
                ReconcileConfig { uppercase_first },
            )
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn roster_config(delimiter: char) -> Result<RosterConfig> {
    if !delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character, got {:?}", delimiter);
    }
    Ok(RosterConfig {
        delimiter: delimiter as u8,
        ..Default::default()
    })
}

fn load_index(csv: &Path, config: &RosterConfig) -> Result<RosterIndex> {
    info!("Loading roster from {:?}", csv);
    let rows = read_roster_file(csv, config).context("Failed to load roster")?;
    let index = RosterIndex::build(rows);
    if index.is_empty() {
        warn!("Roster {:?} has no usable rows; no speaker will change", csv);
    }
    info!(
        "Roster index: {} aliases, {} canonical names",
        index.alias_count(),
        index.canonical_count()
    );
    Ok(index)
}

/// Load the document; a missing speaker block is reported and yields `None`
fn load_document(path: &Path) -> Result<Option<TrsDocument>> {
    match TrsDocument::from_file(path) {
        Ok(document) => Ok(Some(document)),
        Err(ReconcileError::DocumentStructure(msg)) => {
            warn!("{}", msg);
            println!("No <Speakers> block found in {}; nothing to do.", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to parse document {:?}", path)),
    }
}

fn reconcile_document(
    path: &Path,
    csv: &Path,
    output: Option<&Path>,
    report: Option<&Path>,
    roster_config: RosterConfig,
    config: ReconcileConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let index = load_index(csv, &roster_config)?;

    let Some(mut document) = load_document(path)? else {
        return Ok(());
    };

    let result = execute_reconcile(document.speakers_mut(), &index, &config);
    print_change_log(&result);

    let rendered = execute_render(&document, path, output, report, &result, &render_config)
        .context("Failed to write output")?;

    println!();
    println!("Corrected document saved as: {}", rendered.document_path.display());
    if let Some(report_path) = rendered.report_path {
        println!("Change report saved as: {}", report_path.display());
    }
    print_summary(&result.counts);

    Ok(())
}

fn analyze_document(
    path: &Path,
    csv: &Path,
    roster_config: RosterConfig,
    config: ReconcileConfig,
) -> Result<()> {
    let index = load_index(csv, &roster_config)?;

    let Some(mut document) = load_document(path)? else {
        return Ok(());
    };

    let mut alias_matches = 0;
    let mut canonical_matches = 0;
    let mut unmatched = Vec::new();
    let mut nameless = 0;
    let mut already_correct = 0;

    for speaker in document.speakers() {
        let decision = resolve(speaker, &index);
        match (speaker.name(), decision.matched) {
            (None, _) => nameless += 1,
            (Some(_), Some(MatchKind::Alias)) => alias_matches += 1,
            (Some(_), Some(MatchKind::Canonical)) => canonical_matches += 1,
            (Some(name), None) => unmatched.push(match speaker.id() {
                Some(id) => format!("{} ({})", name, id),
                None => name.to_string(),
            }),
        }
        if decision.matched.is_some() && decision.is_noop() {
            already_correct += 1;
        }
    }

    println!("Speaker Analysis");
    println!("================");
    println!("Roster aliases: {}", index.alias_count());
    println!("Roster canonical names: {}", index.canonical_count());
    println!(
        "Doctype: {}",
        document.doctype().unwrap_or_else(|| "(none)".to_string())
    );
    println!("Speakers in document: {}", document.speakers().len());
    println!("Matched by alias: {}", alias_matches);
    println!("Matched by canonical name: {}", canonical_matches);
    println!("Already correct: {}", already_correct);
    println!("Without name: {}", nameless);
    println!("Not in roster: {}", unmatched.len());
    for name in &unmatched {
        println!("  {}", name);
    }
    println!();

    let result = execute_reconcile(document.speakers_mut(), &index, &config);

    println!("Pending Changes");
    println!("---------------");
    if result.log.is_empty() {
        println!("None");
    } else {
        print_change_log(&result);
    }
    print_summary(&result.counts);

    Ok(())
}

fn print_change_log(result: &ReconcileResult) {
    for line in result.log.lines() {
        println!("{}", line);
    }
}

fn print_summary(counts: &ChangeCounts) {
    println!("Speaker names changed: {}", counts.names_changed);
    println!("Accents filled: {}", counts.accents_changed);
    if counts.uppercased_only > 0 {
        println!("Uppercased only: {}", counts.uppercased_only);
    }
}
