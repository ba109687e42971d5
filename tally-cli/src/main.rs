use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tally_core::time::today_in;
use tally_core::{CandidateRecord, Normalized, Normalizer, TaxonomyStore, TransactionKind, ValidationError};
use tally_ingest::{Expectation, Preprocessor, TaxonomySource, load_taxonomy_file, read_batch};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod ledger;
mod llm;
mod render;
mod state;

use config::Config;
use llm::Extractor;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Turn short free-text messages into validated transactions"
)]
struct Cli {
    /// -v for info logs, -vv for debug (RUST_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store extractor API keys in ~/.tally/auth.json
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Inspect the taxonomy file
    Taxonomy {
        #[command(subcommand)]
        command: TaxonomyCommand,
    },

    /// Normalize a candidate record JSON without calling the extractor
    Check {
        /// JSON file, or - for stdin
        #[arg(long, default_value = "-")]
        json: String,

        /// Date the window is relative to (default: today in the configured timezone)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Extract, normalize and confirm one message
    Log {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Append the accepted transaction to this JSONL file
        #[arg(long)]
        ledger: Option<PathBuf>,

        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Run a CSV of sample messages through extraction and normalization
    Batch {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write default config.toml and taxonomy.toml if missing
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    PasteOpenaiApiKey,
    PasteGroqApiKey,
}

#[derive(Subcommand, Debug)]
enum TaxonomyCommand {
    /// Print accounts, categories and the lexicon version
    Show {
        /// Taxonomy file (default: runtime.taxonomy_file)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteOpenaiApiKey => auth::openai_paste_api_key()?,
            AuthCommand::PasteGroqApiKey => auth::groq_paste_api_key()?,
        },

        Command::Taxonomy { command } => match command {
            TaxonomyCommand::Show { file } => {
                let cfg = config::load_config()?;
                let path = match file {
                    Some(p) => p,
                    None => cfg.runtime.taxonomy_path()?,
                };
                let source = read_taxonomy(&path)?;
                println!("ACCOUNTS: {:?}", source.accounts);
                println!("EXPENSE : {:?}", source.expense_categories);
                println!("INCOME  : {:?}", source.income_categories);
                println!("LEXICON : {}", source.lexicon().version);
            }
        },

        Command::Check { json, today } => {
            let session = Session::open(config::load_config()?, today)?;
            let candidate = read_candidate(&json)?;
            match session.normalizer.normalize(&candidate, session.today) {
                Ok(n) => {
                    println!("{}", serde_json::to_string_pretty(&n)?);
                    eprintln!("{}", render::confirmation_message(&n.transaction));
                }
                Err(e) => return reject(&e),
            }
        }

        Command::Log { text, ledger, today } => {
            let session = Session::open(config::load_config()?, today)?;
            let extractor = Extractor::from_config(&session.config.llm)?;
            let text = text.join(" ");
            match session.extract_and_normalize(&extractor, &text).await? {
                Ok(n) => {
                    println!("{}", render::confirmation_message(&n.transaction));
                    if let Some(path) = ledger {
                        ledger::append(&path, &n.transaction)?;
                        info!(path = %path.display(), "appended to ledger");
                    }
                }
                Err(e) => return reject(&e),
            }
        }

        Command::Batch { csv, today } => {
            let session = Session::open(config::load_config()?, today)?;
            let extractor = Extractor::from_config(&session.config.llm)?;
            run_batch(&session, &extractor, &csv).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loaded configuration, the shared taxonomy and the date checks run against.
struct Session {
    config: Config,
    normalizer: Normalizer,
    preprocessor: Preprocessor,
    today: NaiveDate,
}

impl Session {
    fn open(config: Config, today: Option<NaiveDate>) -> Result<Self> {
        let today = match today {
            Some(d) => d,
            None => today_in(&config.runtime.timezone)?,
        };
        let source = read_taxonomy(&config.runtime.taxonomy_path()?)?;

        let store = TaxonomyStore::shared();
        let version = source.install(&store);
        info!(version, %today, "taxonomy installed");

        let normalizer = Normalizer::new(store)
            .with_lexicon(source.lexicon())
            .with_policy(config.policy.resolve_policy())
            .with_window(config.policy.window());

        Ok(Self {
            config,
            normalizer,
            preprocessor: Preprocessor::new()?,
            today,
        })
    }

    /// Outer error: transport or parsing trouble. Inner error: the record
    /// was understood but rejected.
    async fn extract_and_normalize(
        &self,
        extractor: &Extractor,
        text: &str,
    ) -> Result<Result<Normalized, ValidationError>> {
        let cleaned = self.preprocessor.preprocess(text, self.today);
        let taxonomy = self.normalizer.store().snapshot();
        let candidate = extractor
            .extract(&cleaned, &taxonomy, &self.config.runtime.timezone, self.today)
            .await?;
        Ok(self.normalizer.normalize(&candidate, self.today))
    }
}

fn read_taxonomy(path: &Path) -> Result<TaxonomySource> {
    if !path.exists() {
        bail!(
            "taxonomy file not found: {} (run: tally config init)",
            path.display()
        );
    }
    load_taxonomy_file(path)
}

fn read_candidate(src: &str) -> Result<CandidateRecord> {
    let s = if src == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s).context("read stdin")?;
        s
    } else {
        std::fs::read_to_string(src).with_context(|| format!("read {src}"))?
    };
    let value: serde_json::Value = serde_json::from_str(&s).context("candidate is not valid JSON")?;
    CandidateRecord::from_value(value).context("candidate does not fit a transaction record")
}

fn reject(err: &ValidationError) -> Result<()> {
    eprintln!("{}", render::rejection_message(err));
    bail!("record rejected: {err}")
}

async fn run_batch(session: &Session, extractor: &Extractor, csv: &Path) -> Result<()> {
    let messages = read_batch(csv)?;
    let taxonomy = session.normalizer.store().snapshot();
    println!("ACCOUNTS: {:?}", taxonomy.accounts);
    println!("EXPENSE : {:?}", taxonomy.expense_categories);
    println!("INCOME  : {:?}", taxonomy.income_categories);
    println!("{}", "=".repeat(60));

    let (mut ok, mut failed, mut mismatched) = (0usize, 0usize, 0usize);
    for msg in &messages {
        let outcome = session.extract_and_normalize(extractor, &msg.text).await;
        let got = match &outcome {
            Ok(Ok(n)) => {
                println!("OK: {}", msg.text);
                let tx = &n.transaction;
                println!("  - desc: {}", tx.description);
                println!("  - date: {}", tx.date);
                println!("  - amt : {}", render::fmt_amount_eur(tx.amount));
                println!("  - acc : {}", tx.account);
                println!("  - cat : {} ({:?})", tx.categories().join(", "), n.basis);
                ok += 1;
                Some(match tx.kind() {
                    TransactionKind::Expense => Expectation::Expense,
                    TransactionKind::Income => Expectation::Income,
                })
            }
            Ok(Err(e)) => {
                println!("FAIL: {}", msg.text);
                println!("  > {e}");
                failed += 1;
                Some(Expectation::Reject)
            }
            Err(e) => {
                println!("FAIL: {}", msg.text);
                println!("  > {e:#}");
                failed += 1;
                None
            }
        };
        if let Some(expected) = msg.expect {
            if got != Some(expected) {
                println!("  ! expected {expected:?}");
                mismatched += 1;
            }
        }
        println!("{}", "-".repeat(60));
    }

    println!("{ok} ok, {failed} failed, {mismatched} not as expected ({} messages)", messages.len());
    if mismatched > 0 {
        bail!("{mismatched} message(s) did not match their expectation");
    }
    Ok(())
}
