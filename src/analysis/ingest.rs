// Input parsing: free text (one verbatim per line), tabular files with a
// `verbatim` column, and training exports. Malformed tabular input yields an
// empty set rather than an error.
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Split free text into trimmed, non-empty verbatim lines.
pub fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Load verbatims from a file: `.csv` goes through the `verbatim` column,
/// anything else is read as one verbatim per line.
pub fn read_verbatims(path: &Path) -> Result<Vec<String>> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if ext.eq_ignore_ascii_case("csv") {
        read_verbatim_column(path)
    } else {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(split_lines(&raw))
    }
}

/// Extract the `verbatim` column (case-insensitive header) from a CSV file.
/// A file without that column yields an empty set.
pub fn read_verbatim_column(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let Some(column) = header_position(&headers, "verbatim") else {
        return Ok(Vec::new());
    };

    let mut texts = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(field) = record.get(column) {
            let text = field.trim();
            if !text.is_empty() {
                texts.push(text.to_string());
            }
        }
    }
    Ok(texts)
}

fn header_position(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// One row of a training export. Parsed for display summaries only; records
/// are never merged into the classification lexicons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRecord {
    pub polarity: String,
    pub verbatim: String,
    pub themes: Vec<String>,
    pub sub_themes: Vec<String>,
}

/// Parse a training file with `polarite`, `verbatim`, `thematiques` and
/// optional `sous_thematiques` columns. Rows missing any required field are
/// dropped; a file missing a required header yields no records.
pub fn read_training_file(path: &Path) -> Result<Vec<TrainingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let (Some(polarity_col), Some(verbatim_col), Some(themes_col)) = (
        header_position(&headers, "polarite"),
        header_position(&headers, "verbatim"),
        header_position(&headers, "thematiques"),
    ) else {
        return Ok(Vec::new());
    };
    let sub_themes_col = header_position(&headers, "sous_thematiques");

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let polarity = record.get(polarity_col).map(str::trim).unwrap_or("");
        let verbatim = record.get(verbatim_col).map(str::trim).unwrap_or("");
        let themes = split_list(record.get(themes_col).unwrap_or(""));
        if polarity.is_empty() || verbatim.is_empty() || themes.is_empty() {
            continue;
        }
        let sub_themes = sub_themes_col
            .and_then(|col| record.get(col))
            .map(split_list)
            .unwrap_or_default();

        records.push(TrainingRecord {
            polarity: polarity.to_lowercase(),
            verbatim: verbatim.to_string(),
            themes,
            sub_themes,
        });
    }
    Ok(records)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TrainingSummary {
    pub total: usize,
    pub by_polarity: BTreeMap<String, usize>,
    pub by_theme: BTreeMap<String, usize>,
}

pub fn summarize_training(records: &[TrainingRecord]) -> TrainingSummary {
    let mut summary = TrainingSummary {
        total: records.len(),
        ..TrainingSummary::default()
    };
    for record in records {
        *summary
            .by_polarity
            .entry(record.polarity.clone())
            .or_insert(0) += 1;
        for theme in &record.themes {
            *summary.by_theme.entry(theme.clone()).or_insert(0) += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        path
    }

    #[test]
    fn test_split_lines_trims_and_drops_empty() {
        let lines = split_lines("  premier avis  \n\n   \nsecond avis\n");
        assert_eq!(lines, vec!["premier avis", "second avis"]);
    }

    #[test]
    fn test_read_verbatim_column_case_insensitive_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "avis.csv",
            "id,Verbatim,date\n1,accueil agréable,2024-01-01\n2,  ,2024-01-02\n3,sortie rapide,2024-01-03\n",
        );
        let texts = read_verbatim_column(&path).unwrap();
        assert_eq!(texts, vec!["accueil agréable", "sortie rapide"]);
    }

    #[test]
    fn test_missing_verbatim_column_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "avis.csv", "id,commentaire\n1,quelque chose\n");
        let texts = read_verbatim_column(&path).unwrap();
        assert!(texts.is_empty());
    }

    #[test]
    fn test_read_verbatims_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();
        let txt = write_file(&dir, "avis.txt", "un avis\nun autre avis\n");
        assert_eq!(read_verbatims(&txt).unwrap().len(), 2);

        let csv = write_file(&dir, "avis.csv", "verbatim\nun avis\n");
        assert_eq!(read_verbatims(&csv).unwrap(), vec!["un avis"]);
    }

    #[test]
    fn test_training_file_drops_incomplete_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "training.csv",
            "polarite,verbatim,thematiques,sous_thematiques\n\
             positif,accueil agréable,\"accueil, sortie\",amabilité\n\
             ,verbatim sans polarité,accueil,\n\
             négatif,repas froid,,\n\
             négatif,attente interminable,prise_en_charge,\n",
        );
        let records = read_training_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].polarity, "positif");
        assert_eq!(records[0].themes, vec!["accueil", "sortie"]);
        assert_eq!(records[0].sub_themes, vec!["amabilité"]);
        assert_eq!(records[1].verbatim, "attente interminable");
    }

    #[test]
    fn test_training_file_missing_required_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "training.csv", "verbatim,thematiques\navis,accueil\n");
        let records = read_training_file(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_training_summary_counts() {
        let records = vec![
            TrainingRecord {
                polarity: "positif".to_string(),
                verbatim: "a".to_string(),
                themes: vec!["accueil".to_string(), "sortie".to_string()],
                sub_themes: vec![],
            },
            TrainingRecord {
                polarity: "négatif".to_string(),
                verbatim: "b".to_string(),
                themes: vec!["accueil".to_string()],
                sub_themes: vec![],
            },
        ];
        let summary = summarize_training(&records);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.by_polarity.get("positif"), Some(&1));
        assert_eq!(summary.by_theme.get("accueil"), Some(&2));
        assert_eq!(summary.by_theme.get("sortie"), Some(&1));
    }
}
