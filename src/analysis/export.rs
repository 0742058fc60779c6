// Export of analysis results: a flat CSV table (round-trippable) and a
// structured JSON document with metadata, aggregates and an optionally
// filtered verbatim list.
use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

use super::batch::{AnalysisResult, SentimentCounts, Verbatim};
use super::classifier::Sentiment;
use super::keywords::KeywordCount;
use super::lexicon::Lexicon;

pub const CSV_HEADERS: [&str; 4] = ["verbatim", "sentiment", "thematique", "code"];

/// CSV export: verbatim text, sentiment label, display theme, theme code.
/// Re-parsing the output recovers the same (text, sentiment, code) triples.
pub fn to_csv(result: &AnalysisResult, lexicon: &Lexicon) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for verbatim in &result.verbatims {
        writer.write_record([
            verbatim.text.as_str(),
            verbatim.sentiment.label(),
            lexicon.theme_label(&verbatim.theme),
            verbatim.theme.as_str(),
        ])?;
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("finishing csv export: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

/// Restriction applied to the exported verbatim list. Aggregate counts stay
/// corpus-wide; only the list shrinks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl FilterState {
    fn matches(&self, verbatim: &Verbatim) -> bool {
        if let Some(sentiment) = self.sentiment {
            if verbatim.sentiment != sentiment {
                return false;
            }
        }
        if let Some(theme) = &self.theme {
            if &verbatim.theme != theme {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Serialize)]
struct ExportMetadata<'a> {
    generated_at: String,
    total_verbatims: usize,
    exported_verbatims: usize,
    filter: &'a FilterState,
}

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    metadata: ExportMetadata<'a>,
    sentiment_counts: SentimentCounts,
    theme_counts: &'a BTreeMap<String, usize>,
    keywords: &'a [KeywordCount],
    verbatims: Vec<&'a Verbatim>,
    warnings: &'a [String],
}

pub fn to_json(result: &AnalysisResult, filter: &FilterState) -> Result<String> {
    let verbatims: Vec<&Verbatim> = result
        .verbatims
        .iter()
        .filter(|v| filter.matches(v))
        .collect();

    let export = JsonExport {
        metadata: ExportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            total_verbatims: result.verbatims.len(),
            exported_verbatims: verbatims.len(),
            filter,
        },
        sentiment_counts: result.sentiment_counts,
        theme_counts: &result.theme_counts,
        keywords: &result.keywords,
        verbatims,
        warnings: &result.warnings,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
