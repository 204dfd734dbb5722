//! CLI command definitions, routing, and tracing setup.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use knoex_core::{ConceptFormer, GraphDocument, Triple};
use knoex_lexicon::{JsonLexicon, Ontology};
use knoex_preprocess::{LexiconTagger, PhraseTagger};
use knoex_shared::{
    AppConfig, FormerConfig, StrategyKind, Term, config_file_path, init_config, load_config,
};

const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// knoex: disambiguate extracted terms into a concept graph.
#[derive(Parser)]
#[command(
    name = "knoex",
    version,
    about = "Resolve tagged terms and Hearst-pattern triples to lexicon senses and build concept graphs.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Resolution strategy override.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum StrategyArg {
    FixedAnchors,
    Refine,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FixedAnchors => StrategyKind::FixedAnchors,
            StrategyArg::Refine => StrategyKind::Refine,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Form concepts from batches of tagged terms.
    Form {
        /// JSONL file; each line is a JSON array of terms forming one batch.
        #[arg(short, long)]
        input: PathBuf,

        /// Lexicon file (defaults to `lexicon.path` from the config).
        #[arg(short, long)]
        lexicon: Option<PathBuf>,

        /// Resolution strategy (defaults to the config value).
        #[arg(short, long)]
        strategy: Option<StrategyArg>,

        /// Return name-concepts as top-level members.
        #[arg(long)]
        include_names: bool,

        /// Output file for the graph documents (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Resolve Hearst-pattern triples into one concept graph.
    Hearst {
        /// JSONL file; each line is a `{subject, relation, object}` triple.
        #[arg(short, long)]
        input: PathBuf,

        /// Lexicon file (defaults to `lexicon.path` from the config).
        #[arg(short, long)]
        lexicon: Option<PathBuf>,

        /// Return name-concepts as top-level members.
        #[arg(long)]
        include_names: bool,

        /// Output file for the graph document (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Tag a phrase and print the resulting term.
    Tag {
        /// Phrase text.
        phrase: String,

        /// Lexicon file (defaults to `lexicon.path` from the config).
        #[arg(short, long)]
        lexicon: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "knoex=info",
        1 => "knoex=debug",
        _ => "knoex=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so graph output on stdout stays clean.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Form {
            input,
            lexicon,
            strategy,
            include_names,
            out,
        } => cmd_form(
            &input,
            lexicon.as_deref(),
            strategy,
            include_names,
            out.as_deref(),
        ),
        Command::Hearst {
            input,
            lexicon,
            include_names,
            out,
        } => cmd_hearst(&input, lexicon.as_deref(), include_names, out.as_deref()),
        Command::Tag { phrase, lexicon } => cmd_tag(&phrase, lexicon.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_form(
    input: &Path,
    lexicon: Option<&Path>,
    strategy: Option<StrategyArg>,
    include_names: bool,
    out: Option<&Path>,
) -> Result<()> {
    let mut config = load_config()?;
    if let Some(strategy) = strategy {
        config.disambiguation.strategy = strategy.into();
    }
    if include_names {
        config.disambiguation.include_name_concepts = true;
    }

    let lexicon = open_lexicon(lexicon, &config)?;
    let batches: Vec<(usize, Vec<Term>)> = read_jsonl(input)?;
    let former = ConceptFormer::new(&lexicon, FormerConfig::from(&config));

    info!(
        input = %input.display(),
        batches = batches.len(),
        lexicon = lexicon.name(),
        "forming concepts"
    );

    let progress = batch_progress(batches.len() as u64)?;
    let mut writer = open_output(out)?;
    let mut failed = 0usize;
    let mut concepts = 0usize;
    let mut unresolved = 0usize;

    for (line, terms) in &batches {
        match former.form_concepts(terms) {
            Ok(formation) => {
                concepts += formation.graph.members().len();
                unresolved += formation.unresolved.len();
                let doc = GraphDocument::new(lexicon.name(), TOOL_VERSION, &formation.graph)
                    .with_dropped(&formation.unresolved, &formation.excluded);
                write_line(&mut writer, &doc)?;
            }
            Err(e) => {
                failed += 1;
                error!(line, error = %e, "batch failed");
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    writer.flush().wrap_err("failed to flush output")?;

    eprintln!();
    eprintln!("  Batches:    {}", batches.len());
    eprintln!("  Failed:     {failed}");
    eprintln!("  Concepts:   {concepts}");
    eprintln!("  Unresolved: {unresolved}");
    eprintln!();

    if failed > 0 {
        return Err(eyre!("{failed} of {} batches failed", batches.len()));
    }
    Ok(())
}

fn cmd_hearst(
    input: &Path,
    lexicon: Option<&Path>,
    include_names: bool,
    out: Option<&Path>,
) -> Result<()> {
    let mut config = load_config()?;
    if include_names {
        config.disambiguation.include_name_concepts = true;
    }

    let lexicon = open_lexicon(lexicon, &config)?;
    let triples: Vec<Triple> = read_jsonl(input)?
        .into_iter()
        .map(|(_, triple)| triple)
        .collect();

    info!(
        input = %input.display(),
        triples = triples.len(),
        lexicon = lexicon.name(),
        "resolving hearst pairs"
    );

    let tagger = LexiconTagger::new(&lexicon);
    let former = ConceptFormer::new(&lexicon, FormerConfig::from(&config));
    let resolution = former.find_hearst_concepts(&triples, &tagger)?;

    let mut writer = open_output(out)?;
    let doc = GraphDocument::new(lexicon.name(), TOOL_VERSION, &resolution.graph);
    write_line(&mut writer, &doc)?;
    writer.flush().wrap_err("failed to flush output")?;

    eprintln!();
    eprintln!("  Triples:  {}", triples.len());
    eprintln!("  Skipped:  {}", resolution.skipped.len());
    eprintln!("  Concepts: {}", resolution.graph.members().len());
    for (triple, reason) in &resolution.skipped {
        eprintln!(
            "    - {} {} {}: {reason}",
            triple.subject, triple.relation, triple.object
        );
    }
    eprintln!();

    Ok(())
}

fn cmd_tag(phrase: &str, lexicon: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let lexicon = open_lexicon(lexicon, &config)?;
    let term = LexiconTagger::new(&lexicon).tag_phrase(phrase)?;
    println!("{}", serde_json::to_string_pretty(&term)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the lexicon named by `--lexicon`, falling back to the config.
fn open_lexicon(flag: Option<&Path>, config: &AppConfig) -> Result<JsonLexicon> {
    let path = match (flag, config.lexicon.path.as_deref()) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(p)) => PathBuf::from(p),
        (None, None) => {
            return Err(eyre!(
                "no lexicon given: pass --lexicon or set lexicon.path in {}",
                config_file_path()?.display()
            ));
        }
    };

    let lexicon = JsonLexicon::load(&path)?;
    info!(path = %path.display(), synsets = lexicon.len(), "lexicon loaded");
    Ok(lexicon)
}

/// Parse every non-blank line of a JSONL file, keeping 1-based line numbers.
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| -> Result<(usize, T)> {
            let value = serde_json::from_str(line)
                .wrap_err_with(|| format!("{}:{}: invalid JSON", path.display(), i + 1))?;
            Ok((i + 1, value))
        })
        .collect()
}

fn open_output(out: Option<&Path>) -> Result<Box<dyn Write>> {
    match out {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

fn write_line<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn batch_progress(total: u64) -> Result<ProgressBar> {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} batches")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_form_flags() {
        let cli = Cli::try_parse_from([
            "knoex",
            "form",
            "--input",
            "terms.jsonl",
            "--strategy",
            "refine",
            "--include-names",
        ])
        .unwrap();
        match cli.command {
            Command::Form {
                input,
                strategy,
                include_names,
                lexicon,
                out,
            } => {
                assert_eq!(input, PathBuf::from("terms.jsonl"));
                assert!(matches!(strategy, Some(StrategyArg::Refine)));
                assert!(include_names);
                assert!(lexicon.is_none());
                assert!(out.is_none());
            }
            _ => panic!("expected form command"),
        }
    }

    #[test]
    fn strategy_arg_maps_to_config_kind() {
        assert_eq!(
            StrategyKind::from(StrategyArg::FixedAnchors),
            StrategyKind::FixedAnchors
        );
        assert_eq!(StrategyKind::from(StrategyArg::Refine), StrategyKind::Refine);
    }

    #[test]
    fn read_jsonl_skips_blank_lines_and_keeps_numbers() {
        let dir = std::env::temp_dir().join(format!("knoex-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("triples.jsonl");
        std::fs::write(
            &path,
            "{\"subject\":\"dog\",\"relation\":\"is-a\",\"object\":\"animal\"}\n\n\
             {\"subject\":\"cat\",\"relation\":\"is-a\",\"object\":\"animal\"}\n",
        )
        .unwrap();

        let rows: Vec<(usize, Triple)> = read_jsonl(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[1].0, 3);
        assert_eq!(rows[1].1.subject, "cat");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn lexicon_flag_wins_over_config() {
        let config = AppConfig::default();
        let path = Path::new("../../fixtures/lexicon/mini.lexicon.json");
        let lexicon = open_lexicon(Some(path), &config).unwrap();
        assert_eq!(lexicon.name(), "mini-wordnet");
    }
}
