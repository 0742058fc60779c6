// Lexicon-based classifier: one sentiment label and one theme per text.
// Matching is substring containment, not word-boundary — a lexicon entry
// inside a longer word counts as a hit. This reproduces the baseline
// behavior on purpose.
use serde::{Deserialize, Serialize};

use super::lexicon::{Lexicon, DEFAULT_THEME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "positif")]
    Positive,
    #[serde(rename = "négatif")]
    Negative,
    #[serde(rename = "neutre")]
    Neutral,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positif",
            Sentiment::Negative => "négatif",
            Sentiment::Neutral => "neutre",
        }
    }

    pub fn parse(s: &str) -> Option<Sentiment> {
        match s.trim().to_lowercase().as_str() {
            "positif" => Some(Sentiment::Positive),
            "négatif" | "negatif" => Some(Sentiment::Negative),
            "neutre" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub theme: String,
}

/// Classify one text against a lexicon snapshot. Always returns a label:
/// no sentiment hits degrade to neutral, no theme hits to the default theme.
/// Pure with respect to the lexicon argument.
pub fn classify(text: &str, lexicon: &Lexicon) -> Classification {
    let lower = text.to_lowercase();

    let pos = lexicon
        .positive
        .iter()
        .filter(|w| lower.contains(w.as_str()))
        .count();
    let neg = lexicon
        .negative
        .iter()
        .filter(|w| lower.contains(w.as_str()))
        .count();

    let sentiment = if pos > neg {
        Sentiment::Positive
    } else if neg > pos {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    // Strict maximum; ties keep the first theme in declaration order.
    let mut theme = DEFAULT_THEME.to_string();
    let mut best = 0;
    for candidate in &lexicon.themes {
        let hits = candidate
            .keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .count();
        if hits > best {
            best = hits;
            theme = candidate.code.clone();
        }
    }

    Classification { sentiment, theme }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_positive() {
        let lexicon = Lexicon::default();
        let result = classify("Personnel agréable et très efficace", &lexicon);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.theme, "prise_en_charge");
    }

    #[test]
    fn test_classify_negative() {
        let lexicon = Lexicon::default();
        let result = classify("Accueil horrible, secrétaire incompétent", &lexicon);
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.theme, "accueil");
    }

    #[test]
    fn test_no_hits_is_neutral() {
        let lexicon = Lexicon::default();
        let result = classify("le service était correct", &lexicon);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_equal_counts_are_neutral() {
        let lexicon = Lexicon::default();
        // One positive hit (agréable), one negative hit (horrible).
        let result = classify("chambre agréable mais repas horrible", &lexicon);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.theme, "confort");
    }

    #[test]
    fn test_no_theme_hits_assigns_default() {
        let lexicon = Lexicon::default();
        let result = classify("bonjour", &lexicon);
        assert_eq!(result.theme, DEFAULT_THEME);
    }

    #[test]
    fn test_theme_tie_keeps_first_declared() {
        let lexicon = Lexicon::default();
        // One keyword hit each for "accueil" and "sortie"; "accueil" is
        // declared first and wins the tie.
        let result = classify("entre l'accueil et la sortie", &lexicon);
        assert_eq!(result.theme, "accueil");
    }

    #[test]
    fn test_substring_match_inside_longer_word() {
        let lexicon = Lexicon::default();
        // "mal" is a negative entry and matches inside "malade".
        let result = classify("je suis malade", &lexicon);
        assert_eq!(result.sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_distinct_entries_counted_once() {
        let lexicon = Lexicon::default();
        // "mal mal mal" is a single distinct negative entry, so one positive
        // entry on the other side balances it to a tie.
        let result = classify("mal mal mal mais personnel agréable", &lexicon);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let lexicon = Lexicon::default();
        let text = "séjour agréable, sortie rapide";
        assert_eq!(classify(text, &lexicon), classify(text, &lexicon));
    }

    #[test]
    fn test_trained_word_changes_outcome() {
        let mut lexicon = Lexicon::default();
        assert_eq!(
            classify("formidable", &lexicon).sentiment,
            Sentiment::Neutral
        );
        lexicon.add_words(["formidable"], super::super::lexicon::Polarity::Positive);
        assert_eq!(
            classify("formidable", &lexicon).sentiment,
            Sentiment::Positive
        );
    }
}
