//! `scribe` - meeting transcripts to ticket specifications
//!
//! Logs go to stderr and honour `RUST_LOG`; reports and previews go to
//! stdout.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use scribe_core::{
    submit_batch, Decision, DryRunTracker, ReviewSession, ReviewState, Scribe, ScribeConfig,
    StructuredDocument, TicketBatch, Transcript,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scribe", version, about = "Turn meeting transcripts into ticket specifications")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract structured documents from transcripts
    Process {
        /// Transcript files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Also print each review report
        #[arg(long)]
        review: bool,
    },

    /// Extract, review and export one transcript
    Workflow {
        /// Transcript file
        file: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Approve without prompting
        #[arg(long, alias = "yes")]
        non_interactive: bool,
    },

    /// Print the review report of a structured document
    Review {
        /// Structured document
        document: PathBuf,
    },

    /// Validate a hand-edited document and export its ticket batch
    Resume {
        /// Structured document
        document: PathBuf,
        /// Transcript the document came from
        #[arg(long)]
        source: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Submit a ticket batch to the dry-run tracker
    Push {
        /// Ticket batch file
        batch: PathBuf,
        /// Parent epic key
        #[arg(long)]
        epic_key: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = match &cli.config {
        Some(path) => ScribeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScribeConfig::default(),
    };

    match cli.cmd {
        Command::Process {
            files,
            output,
            review,
        } => {
            let scribe = Scribe::new(config)?;
            let transcripts = files
                .iter()
                .map(|path| read_transcript(path))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let docs = scribe.process_many(&transcripts);
            for (path, doc) in files.iter().zip(&docs) {
                let written = write_document(&output, path, doc)?;
                let report = scribe.review(doc.clone()).present()?.to_string();
                write_file(&output_path(&output, path, "_review.txt"), &report)?;
                if review {
                    println!("{report}");
                }
                println!("{} -> {}", path.display(), written.display());
            }
        }
        Command::Workflow {
            file,
            output,
            non_interactive,
        } => {
            let scribe = Scribe::new(config)?;
            let transcript = read_transcript(&file)?;
            let doc = scribe.process(&transcript);
            let doc_path = write_document(&output, &file, &doc)?;

            let mut session = scribe.review(doc);
            println!("{}", session.present()?);
            if non_interactive {
                session.decide(Decision::Proceed)?;
            } else {
                let stdin = io::stdin();
                review_loop(&mut session, &doc_path, &mut stdin.lock())?;
            }

            if session.state() != ReviewState::Approved {
                println!("Cancelled; nothing exported.");
                return Ok(());
            }
            let doc = session.into_approved()?;
            write_document(&output, &file, &doc)?;
            let batch = scribe.batch(&doc, &transcript);
            let batch_path = write_batch(&output, &file, &batch)?;
            println!("{}", batch.preview());
            println!("Ticket batch written to {}", batch_path.display());
        }
        Command::Review { document } => {
            let doc = read_document(&document)?;
            println!("{}", scribe_core::summarize(&doc));
        }
        Command::Resume {
            document,
            source,
            output,
        } => {
            let scribe = Scribe::new(config)?;
            let text = read_text(&document)?;
            let doc = scribe
                .resume(&text)
                .with_context(|| format!("validating {}", document.display()))?;
            let transcript = match &source {
                Some(path) => read_transcript(path)?,
                None => Transcript::new("").with_source(document.display().to_string()),
            };
            let batch = scribe.batch(&doc, &transcript);
            let stem_source = source.as_deref().unwrap_or(&document);
            let batch_path = write_batch(&output, stem_source, &batch)?;
            println!("{}", batch.preview());
            println!("Ticket batch written to {}", batch_path.display());
        }
        Command::Push { batch, epic_key } => {
            let text = read_text(&batch)?;
            let batch = TicketBatch::from_json(&text)
                .with_context(|| format!("parsing ticket batch {}", batch.display()))?;
            println!("{}", batch.preview());
            let summary = submit_batch(&batch, &mut DryRunTracker::new(), epic_key.as_deref());
            println!("{}", summary.render());
            if !summary.is_complete() {
                bail!("{} of {} tickets failed", summary.failed.len(), summary.total);
            }
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Ask for a decision until the session is approved or cancelled
///
/// On `edit` the reviewer changes the document file in place and presses
/// Enter; a rejected edit is reported and the reviewer may try again.
fn review_loop(
    session: &mut ReviewSession,
    doc_path: &Path,
    input: &mut impl BufRead,
) -> anyhow::Result<()> {
    loop {
        match session.state() {
            ReviewState::Approved | ReviewState::Cancelled => return Ok(()),
            ReviewState::Editing => {
                prompt(&format!(
                    "Edit {} and press Enter to continue (or type 'no' to cancel): ",
                    doc_path.display()
                ))?;
                let line = read_line(input)?;
                if matches!(line.parse::<Decision>(), Ok(Decision::Cancel)) {
                    session.decide(Decision::Cancel)?;
                    continue;
                }
                let edited = read_text(doc_path)?;
                match session.resubmit_json(&edited) {
                    Ok(report) => println!("{report}"),
                    Err(err) => eprintln!("Edited document rejected: {err}"),
                }
            }
            ReviewState::Extracted | ReviewState::AwaitingReview => {
                prompt("Proceed with ticket export? [yes/no/edit]: ")?;
                let line = read_line(input)?;
                match line.parse::<Decision>() {
                    Ok(decision) => {
                        session.decide(decision)?;
                    }
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }
}

fn prompt(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()
}

fn read_line(input: &mut impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed before a decision was made");
    }
    Ok(line.trim().to_string())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_transcript(path: &Path) -> anyhow::Result<Transcript> {
    Ok(Transcript::new(read_text(path)?).with_source(path.display().to_string()))
}

fn read_document(path: &Path) -> anyhow::Result<StructuredDocument> {
    StructuredDocument::from_json(&read_text(path)?)
        .with_context(|| format!("validating {}", path.display()))
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "file written");
    Ok(())
}

fn write_document(dir: &Path, source: &Path, doc: &StructuredDocument) -> anyhow::Result<PathBuf> {
    let path = output_path(dir, source, "_structured.json");
    write_file(&path, &doc.to_json()?)?;
    Ok(path)
}

fn write_batch(dir: &Path, source: &Path, batch: &TicketBatch) -> anyhow::Result<PathBuf> {
    let path = output_path(dir, source, "_tickets.json");
    write_file(&path, &batch.to_json()?)?;
    Ok(path)
}

/// `notes/standup.txt` + `_tickets.json` -> `<dir>/standup_tickets.json`
///
/// A `_structured` suffix on the source stem is dropped so that a resumed
/// document exports next to its transcript's name.
fn output_path(dir: &Path, source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "transcript".into(), |s| s.to_string_lossy());
    let stem = stem.strip_suffix("_structured").unwrap_or(&*stem);
    dir.join(format!("{stem}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_test_utils::MEDICATION_LOG;
    use std::io::Cursor;

    fn session() -> ReviewSession {
        let scribe = Scribe::new(ScribeConfig::default()).unwrap();
        let mut session = scribe.review(scribe.process_text(MEDICATION_LOG));
        session.present().unwrap();
        session
    }

    #[test]
    fn output_paths_use_the_source_stem() {
        let dir = Path::new("out");
        assert_eq!(
            output_path(dir, Path::new("notes/standup.txt"), "_tickets.json"),
            Path::new("out/standup_tickets.json")
        );
        assert_eq!(
            output_path(dir, Path::new("out/standup_structured.json"), "_tickets.json"),
            Path::new("out/standup_tickets.json")
        );
    }

    #[test]
    fn review_loop_retries_unknown_answers() {
        let mut session = session();
        let mut input = Cursor::new("maybe\nyes\n");
        review_loop(&mut session, Path::new("unused.json"), &mut input).unwrap();
        assert_eq!(session.state(), ReviewState::Approved);
    }

    #[test]
    fn review_loop_stops_when_input_ends() {
        let mut session = session();
        let mut input = Cursor::new("");
        assert!(review_loop(&mut session, Path::new("unused.json"), &mut input).is_err());
        assert_eq!(session.state(), ReviewState::AwaitingReview);
    }

    #[test]
    fn review_loop_reloads_edits() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        let path = dir.path().join("standup_structured.json");

        let mut doc = session.document().unwrap().clone();
        doc.epics[0].epic_name = "Medication Record".into();
        std::fs::write(&path, doc.to_json().unwrap()).unwrap();

        let mut input = Cursor::new("edit\n\nyes\n");
        review_loop(&mut session, &path, &mut input).unwrap();
        assert_eq!(session.state(), ReviewState::Approved);
        assert_eq!(session.revisions(), 1);
        assert_eq!(session.approved().unwrap().epics[0].epic_name, "Medication Record");
    }

    #[test]
    fn review_loop_keeps_editing_after_a_bad_edit() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut input = Cursor::new("e\n\nno\n");
        review_loop(&mut session, &path, &mut input).unwrap();
        assert_eq!(session.state(), ReviewState::Cancelled);
        assert_eq!(session.revisions(), 0);
    }
}
