// Verbalyse: classify French survey verbatims by sentiment and theme,
// extract corpus keywords, and support lexicon training between runs.
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

mod analysis;

use analysis::{
    analyze, apply_feedback, read_training_file, read_verbatims, split_lines, summarize_training,
    to_csv, to_json, AnalysisResult, Backend, BatchOptions, FilterState, Lexicon, Polarity,
    RemoteClassifier, Sentiment, SharedLexicon,
};

#[derive(Parser)]
#[command(
    name = "verbalyse",
    about = "Analyse de verbatims — sentiment et thématique par lexique"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze verbatims from a file (.txt: one per line, .csv: `verbatim`
    /// column) or from inline text.
    Analyze {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        text: Option<String>,
        /// Base URL of the remote scoring service. Falls back to the
        /// VERBALYSE_REMOTE_URL environment variable when omitted.
        #[arg(long)]
        remote: Option<String>,
        /// Artificial delay before the analysis starts, in milliseconds.
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,
        /// Write the export to this path instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Restrict the JSON export to one sentiment (positif, négatif, neutre).
        #[arg(long)]
        filter_sentiment: Option<String>,
        /// Restrict the JSON export to one theme code.
        #[arg(long)]
        filter_theme: Option<String>,
    },
    /// Promote selected words into a sentiment lexicon, then re-analyze.
    Retrain {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        text: Option<String>,
        /// Comma-separated words to promote.
        #[arg(short, long)]
        words: String,
        /// Target lexicon: positive or negative.
        #[arg(short, long)]
        polarity: String,
        #[arg(long)]
        remote: Option<String>,
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Summarize a training export (polarite / verbatim / thematiques columns).
    TrainingSummary {
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Analyze {
            input,
            text,
            remote,
            delay_ms,
            export,
            out,
            filter_sentiment,
            filter_theme,
        } => {
            let texts = load_texts(input.as_ref(), text.as_deref())?;
            let lexicon = Lexicon::default();
            let remote = resolve_remote(remote);
            let backend = backend_for(remote.as_ref());
            let result = analyze(&texts, &lexicon, &backend, &batch_options(delay_ms));
            let filter = parse_filter(filter_sentiment, filter_theme)?;
            report_warnings(&result);
            emit(&result, &lexicon, export, out.as_ref(), &filter)
        }
        Commands::Retrain {
            input,
            text,
            words,
            polarity,
            remote,
            delay_ms,
            export,
            out,
        } => {
            let texts = load_texts(input.as_ref(), text.as_deref())?;
            let polarity: Polarity = polarity.parse().map_err(|e: String| anyhow!(e))?;
            let selection = parse_words(&words);
            if selection.is_empty() {
                bail!("no words to promote");
            }
            let store = SharedLexicon::default();
            let remote = resolve_remote(remote);
            let backend = backend_for(remote.as_ref());
            let outcome = apply_feedback(
                &store,
                selection,
                polarity,
                &texts,
                &backend,
                &batch_options(delay_ms),
            );
            println!("{} mot(s) ajouté(s) au lexique", outcome.added);
            report_warnings(&outcome.result);
            let lexicon = store.snapshot();
            emit(
                &outcome.result,
                &lexicon,
                export,
                out.as_ref(),
                &FilterState::default(),
            )
        }
        Commands::TrainingSummary { file } => {
            let records = read_training_file(&file)?;
            let summary = summarize_training(&records);
            println!("{} enregistrement(s) d'entraînement", summary.total);
            for (polarity, count) in &summary.by_polarity {
                println!("  {polarity}: {count}");
            }
            if !summary.by_theme.is_empty() {
                println!("thématiques:");
                for (theme, count) in &summary.by_theme {
                    println!("  {theme}: {count}");
                }
            }
            Ok(())
        }
    }
}

fn load_texts(input: Option<&PathBuf>, text: Option<&str>) -> Result<Vec<String>> {
    let texts = match (input, text) {
        (Some(path), _) => read_verbatims(path)?,
        (None, Some(raw)) => split_lines(raw),
        (None, None) => bail!("no input: pass --input or --text"),
    };
    if texts.is_empty() {
        bail!("nothing to analyze");
    }
    Ok(texts)
}

fn resolve_remote(flag: Option<String>) -> Option<RemoteClassifier> {
    flag.or_else(|| std::env::var("VERBALYSE_REMOTE_URL").ok())
        .map(RemoteClassifier::new)
}

fn backend_for(remote: Option<&RemoteClassifier>) -> Backend<'_> {
    match remote {
        Some(remote) => Backend::Remote(remote),
        None => Backend::Local,
    }
}

fn batch_options(delay_ms: u64) -> BatchOptions {
    BatchOptions {
        pre_analysis_delay: Duration::from_millis(delay_ms),
    }
}

fn parse_words(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

fn parse_filter(sentiment: Option<String>, theme: Option<String>) -> Result<FilterState> {
    let sentiment = match sentiment {
        Some(raw) => Some(
            Sentiment::parse(&raw).ok_or_else(|| anyhow!("unknown sentiment: {raw}"))?,
        ),
        None => None,
    };
    Ok(FilterState { sentiment, theme })
}

fn report_warnings(result: &AnalysisResult) {
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
}

fn emit(
    result: &AnalysisResult,
    lexicon: &Lexicon,
    export: Option<ExportFormat>,
    out: Option<&PathBuf>,
    filter: &FilterState,
) -> Result<()> {
    match export {
        None => print_result(result, lexicon),
        Some(ExportFormat::Csv) => write_output(&to_csv(result, lexicon)?, out),
        Some(ExportFormat::Json) => write_output(&to_json(result, filter)?, out),
    }
}

fn write_output(content: &str, out: Option<&PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            println!("Export écrit dans {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::Green,
        Sentiment::Negative => Color::Red,
        Sentiment::Neutral => Color::White,
    }
}

fn print_result(result: &AnalysisResult, lexicon: &Lexicon) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    writeln!(stdout, "{} verbatim(s) analysé(s)\n", result.verbatims.len())?;
    for verbatim in &result.verbatims {
        write!(stdout, "{:>6}  ", verbatim.id)?;
        stdout.set_color(ColorSpec::new().set_fg(Some(sentiment_color(verbatim.sentiment))))?;
        write!(stdout, "{:<8}", verbatim.sentiment.label())?;
        stdout.reset()?;
        writeln!(
            stdout,
            "  {:<22}  {}",
            lexicon.theme_label(&verbatim.theme),
            verbatim.text
        )?;
    }

    let counts = result.sentiment_counts;
    writeln!(
        stdout,
        "\nSentiments: {} positif(s), {} négatif(s), {} neutre(s)",
        counts.positif, counts.negatif, counts.neutre
    )?;

    writeln!(stdout, "Thématiques:")?;
    for (code, count) in &result.theme_counts {
        writeln!(stdout, "  {:<22}  {count}", lexicon.theme_label(code))?;
    }

    if !result.keywords.is_empty() {
        writeln!(stdout, "Mots-clés:")?;
        for keyword in &result.keywords {
            writeln!(stdout, "  {:<22}  {}", keyword.word, keyword.count)?;
        }
    }
    Ok(())
}
