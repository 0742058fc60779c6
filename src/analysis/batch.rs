// Batch analyzer: runs the classifier over every retained line, the keyword
// extractor once over the whole corpus, and aggregates the counts. Items are
// processed strictly in input order, one at a time.
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use super::classifier::{classify, Sentiment};
use super::keywords::{extract_keywords, KeywordCount};
use super::lexicon::Lexicon;
use super::remote::RemoteClassifier;

/// One classified survey comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verbatim {
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
    pub theme: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positif: usize,
    #[serde(rename = "négatif")]
    pub negatif: usize,
    pub neutre: usize,
}

impl SentimentCounts {
    fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positif += 1,
            Sentiment::Negative => self.negatif += 1,
            Sentiment::Neutral => self.neutre += 1,
        }
    }

    pub fn total(self) -> usize {
        self.positif + self.negatif + self.neutre
    }
}

/// Recomputed wholesale on every run; never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub verbatims: Vec<Verbatim>,
    pub sentiment_counts: SentimentCounts,
    pub theme_counts: BTreeMap<String, usize>,
    pub keywords: Vec<KeywordCount>,
    /// Recoverable notices, e.g. per-item remote classifier failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Which classifier handles each item.
pub enum Backend<'a> {
    Local,
    Remote(&'a RemoteClassifier),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Artificial delay before processing starts, mirroring the original
    /// front-end's simulated analysis latency. Zero by default.
    pub pre_analysis_delay: Duration,
}

/// Analyze a list of raw lines. Empty lines (after trimming) are dropped;
/// the rest keep their relative order and get positional ids. A remote
/// failure on one item falls back to the local classifier for that item
/// only and never aborts the batch.
pub fn analyze(
    texts: &[String],
    lexicon: &Lexicon,
    backend: &Backend,
    options: &BatchOptions,
) -> AnalysisResult {
    if !options.pre_analysis_delay.is_zero() {
        thread::sleep(options.pre_analysis_delay);
    }

    let retained: Vec<String> = texts
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let bar = ProgressBar::new(retained.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len}")
    {
        bar.set_style(style.progress_chars("=>-"));
    }

    let theme_hint = lexicon.theme_hint();
    let mut warnings = Vec::new();
    let mut verbatims = Vec::with_capacity(retained.len());

    for (i, text) in retained.iter().enumerate() {
        let classification = match backend {
            Backend::Local => classify(text, lexicon),
            Backend::Remote(remote) => match remote.classify(text, &theme_hint) {
                Ok(classification) => classification,
                Err(e) => {
                    warnings.push(format!(
                        "remote classifier unreachable for v_{i}: {e}; classified locally"
                    ));
                    classify(text, lexicon)
                }
            },
        };
        verbatims.push(Verbatim {
            id: format!("v_{i}"),
            text: text.clone(),
            sentiment: classification.sentiment,
            theme: classification.theme,
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    let keywords = extract_keywords(&retained, &lexicon.stop_words);

    let mut sentiment_counts = SentimentCounts::default();
    let mut theme_counts = BTreeMap::new();
    for verbatim in &verbatims {
        sentiment_counts.record(verbatim.sentiment);
        *theme_counts.entry(verbatim.theme.clone()).or_insert(0) += 1;
    }

    AnalysisResult {
        verbatims,
        sentiment_counts,
        theme_counts,
        keywords,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_empty_lines_dropped_and_order_preserved() {
        let lexicon = Lexicon::default();
        let input = lines(&[
            "  accueil agréable  ",
            "",
            "   ",
            "personnel incompétent",
            "rien de spécial",
        ]);
        let result = analyze(&input, &lexicon, &Backend::Local, &BatchOptions::default());

        assert_eq!(result.verbatims.len(), 3);
        assert_eq!(result.verbatims[0].id, "v_0");
        assert_eq!(result.verbatims[0].text, "accueil agréable");
        assert_eq!(result.verbatims[1].id, "v_1");
        assert_eq!(result.verbatims[1].text, "personnel incompétent");
        assert_eq!(result.verbatims[2].id, "v_2");
    }

    #[test]
    fn test_counts_match_verbatims() {
        let lexicon = Lexicon::default();
        let input = lines(&[
            "accueil agréable",
            "personnel incompétent",
            "rien de spécial",
        ]);
        let result = analyze(&input, &lexicon, &Backend::Local, &BatchOptions::default());

        assert_eq!(result.sentiment_counts.positif, 1);
        assert_eq!(result.sentiment_counts.negatif, 1);
        assert_eq!(result.sentiment_counts.neutre, 1);
        assert_eq!(result.sentiment_counts.total(), result.verbatims.len());
        assert_eq!(result.theme_counts.get("accueil"), Some(&1));
        assert_eq!(result.theme_counts.get("prise_en_charge"), Some(&1));
    }

    #[test]
    fn test_keywords_cover_whole_corpus() {
        let lexicon = Lexicon::default();
        let input = lines(&["le personnel est gentil", "personnel gentil et efficace"]);
        let result = analyze(&input, &lexicon, &Backend::Local, &BatchOptions::default());

        assert_eq!(result.keywords[0].word, "personnel");
        assert_eq!(result.keywords[0].count, 2);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let lexicon = Lexicon::default();
        let input = lines(&["chambre propre", "sortie sans ordonnance", "bonjour"]);
        let first = analyze(&input, &lexicon, &Backend::Local, &BatchOptions::default());
        let second = analyze(&input, &lexicon, &Backend::Local, &BatchOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let lexicon = Lexicon::default();
        let result = analyze(&[], &lexicon, &Backend::Local, &BatchOptions::default());
        assert!(result.verbatims.is_empty());
        assert!(result.keywords.is_empty());
        assert_eq!(result.sentiment_counts.total(), 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_remote_failure_falls_back_per_item() {
        use crate::analysis::classifier::classify;

        let lexicon = Lexicon::default();
        // Nothing listens here: every item fails remotely and is classified
        // locally instead, without aborting the batch.
        let remote =
            RemoteClassifier::new("http://127.0.0.1:9").with_delay(Duration::from_millis(0));
        let input = lines(&["accueil agréable", "personnel incompétent"]);
        let result = analyze(
            &input,
            &lexicon,
            &Backend::Remote(&remote),
            &BatchOptions::default(),
        );

        assert_eq!(result.verbatims.len(), 2);
        assert_eq!(result.warnings.len(), 2);
        for verbatim in &result.verbatims {
            let local = classify(&verbatim.text, &lexicon);
            assert_eq!(verbatim.sentiment, local.sentiment);
            assert_eq!(verbatim.theme, local.theme);
        }
    }
}
