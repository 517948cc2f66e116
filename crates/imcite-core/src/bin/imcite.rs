//! imcite command-line interface
//!
//! `imcite refs.bib` reconciles a bibliography against INSPIRE-HEP,
//! rewriting the file in place (previous version kept as
//! `refs-old.bib`) and logging citation-key changes next to it.
//! `--replace PATH` then applies those changes to a `.tex` file or to
//! every `.tex` file under a directory; `--from-log` drives a
//! replace-only run from a previous run's log.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use imcite_core::bibliography::{load_bibliography, rename_log_path, write_bibliography};
use imcite_core::{reconcile, rewrite_target, InspireSource, ReconcileOptions, RenameMap};

#[derive(Parser, Debug)]
#[command(
    name = "imcite",
    version,
    about = "Reconcile a BibTeX bibliography against INSPIRE-HEP and update \\cite keys"
)]
struct Cli {
    /// Input/output .bib file (omit when only using --replace)
    bibfile: Option<PathBuf>,

    /// Rewrite citation keys in a .tex file, or in all .tex files
    /// under PATH if it is a directory
    #[arg(long, value_name = "PATH")]
    replace: Option<PathBuf>,

    /// With --replace and no bibliography run, load the rename map
    /// from a previous run's log (defaults to ./citation_key_changes.log)
    #[arg(
        long,
        value_name = "LOG",
        num_args = 0..=1,
        default_missing_value = "citation_key_changes.log"
    )]
    from_log: Option<PathBuf>,

    /// Per-entry debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "imcite_core=debug,imcite=debug"
    } else {
        "imcite_core=info,imcite=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    if cli.bibfile.is_none() && cli.replace.is_none() {
        eprintln!("error: a .bib file is required unless --replace is used");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> imcite_core::Result<()> {
    let mut map = RenameMap::new();

    if let Some(bib) = &cli.bibfile {
        let entries = load_bibliography(bib)?;
        let source = InspireSource::new();

        let bar = ProgressBar::new(entries.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40}] {pos}/{len} ({elapsed})",
            )
            .expect("valid progress template")
            .progress_chars("=> "),
        );
        bar.set_message("Updating BibTeX");

        let outcome = reconcile(&source, entries, &ReconcileOptions::default(), || {
            bar.inc(1)
        })
        .await;
        bar.finish();

        write_bibliography(bib, &outcome.entries)?;

        if !outcome.unmatched.is_empty() {
            println!("\n==== Not found on INSPIRE-HEP ====");
            println!("Give the entries below at least an arXiv id or a DOI.");
            for key in &outcome.unmatched {
                println!("  {key}");
            }
        }

        if !outcome.renames.is_empty() {
            let log = rename_log_path(bib);
            outcome
                .renames
                .save(&log)
                .map_err(|e| imcite_core::Error::Io {
                    path: log.clone(),
                    source: e,
                })?;
            println!("\n==== Citation key changes (old --> new) ====");
            for (old, new) in outcome.renames.iter() {
                println!("{old} --> {new}");
            }
            println!("\nLogged to {}", log.display());
        }

        map = outcome.renames;
    }

    if let Some(target) = &cli.replace {
        if map.is_empty() {
            if let Some(log) = &cli.from_log {
                map = RenameMap::load(log).map_err(|e| imcite_core::Error::Io {
                    path: log.clone(),
                    source: e,
                })?;
            }
        }
        if map.is_empty() {
            println!("No citation key changes available to apply. Skipping replacement.");
            return Ok(());
        }

        println!("Replacing citation keys under {}", target.display());
        let summary = rewrite_target(target, &map);
        for path in &summary.modified {
            println!("  updated {}", path.display());
        }
        for (path, reason) in &summary.failed {
            println!("  FAILED  {} ({reason})", path.display());
        }
        println!(
            "{} updated, {} unchanged, {} failed",
            summary.modified.len(),
            summary.unchanged.len(),
            summary.failed.len()
        );
    }

    Ok(())
}
