// Lexicon store backing sentiment and theme classification.
// Word lists are French-only and mutable at runtime through the training
// loop; they live in process memory and reset to the defaults on restart.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Catch-all theme assigned when a text matches no theme keyword.
pub const DEFAULT_THEME: &str = "rien_a_signaler";

/// Target lexicon for a training mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl std::str::FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "positif" => Ok(Polarity::Positive),
            "negative" | "negatif" | "négatif" => Ok(Polarity::Negative),
            other => Err(format!("unknown polarity: {other}")),
        }
    }
}

/// A coarse topic with its keyword list. Theme order matters: the classifier
/// resolves ties by keeping the first theme declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub code: String,
    pub label: String,
    pub keywords: Vec<String>,
}

impl Theme {
    fn new(code: &str, label: &str, keywords: &[&str]) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Mutable lexicon: sentiment word sets, ordered theme list and stop words.
/// All entries are stored lower-cased.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub positive: HashSet<String>,
    pub negative: HashSet<String>,
    pub themes: Vec<Theme>,
    pub stop_words: HashSet<String>,
}

const POSITIVE_WORDS: &[&str] = &[
    "bon",
    "bien",
    "excellent",
    "parfait",
    "satisfait",
    "content",
    "merci",
    "super",
    "génial",
    "agréable",
    "efficace",
    "rapide",
    "professionnel",
    "aimable",
    "courtois",
    "souriant",
    "attentionné",
];

const NEGATIVE_WORDS: &[&str] = &[
    "mauvais",
    "mal",
    "horrible",
    "nul",
    "décevant",
    "mécontent",
    "problème",
    "lent",
    "désagréable",
    "incompétent",
    "erreur",
    "retard",
    "sale",
    "bruyant",
    "inadmissible",
];

const STOP_WORDS: &[&str] = &[
    "les", "des", "une", "aux", "est", "était", "sont", "être", "avoir", "ont", "avons", "avez",
    "pour", "dans", "avec", "sans", "sur", "sous", "par", "pas", "mais", "donc", "car", "qui",
    "que", "quoi", "dont", "cette", "ces", "mon", "son", "ses", "mes", "nos", "vos", "nous",
    "vous", "ils", "elles", "elle", "tout", "tous", "toute", "toutes", "fait", "faire", "comme",
    "aussi", "alors", "quand", "même", "très", "trop", "plus", "moins", "leur", "leurs", "cela",
    "ceci", "chez", "ainsi", "après", "avant", "entre", "vers", "lors", "afin",
];

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            positive: word_set(POSITIVE_WORDS),
            negative: word_set(NEGATIVE_WORDS),
            themes: vec![
                Theme::new(
                    "accueil",
                    "Accueil / Admission",
                    &[
                        "accueil",
                        "réception",
                        "admission",
                        "entrée",
                        "enregistrement",
                        "arrivée",
                        "première impression",
                    ],
                ),
                Theme::new(
                    "prise_en_charge",
                    "Prise en charge",
                    &[
                        "personnel",
                        "médecin",
                        "infirmière",
                        "infirmier",
                        "soins",
                        "traitement",
                        "équipe",
                        "douleur",
                        "examen",
                    ],
                ),
                Theme::new(
                    "confort",
                    "Hospitalité / Confort",
                    &[
                        "chambre",
                        "repas",
                        "lit",
                        "propreté",
                        "propre",
                        "bruit",
                        "calme",
                        "confort",
                        "température",
                        "hygiène",
                    ],
                ),
                Theme::new(
                    "sortie",
                    "Sortie",
                    &[
                        "sortie",
                        "départ",
                        "ordonnance",
                        "compte rendu",
                        "retour",
                        "domicile",
                    ],
                ),
                Theme::new(DEFAULT_THEME, "Rien à signaler", &[]),
            ],
            stop_words: word_set(STOP_WORDS),
        }
    }
}

impl Lexicon {
    /// Insert normalized words into the chosen polarity list. Words already
    /// present in either list are skipped; nothing is ever removed. Returns
    /// the number of words actually inserted.
    pub fn add_words<I, S>(&mut self, words: I, target: Polarity) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for word in words {
            let Some(word) = normalize_word(word.as_ref()) else {
                continue;
            };
            if self.positive.contains(&word) || self.negative.contains(&word) {
                continue;
            }
            let set = match target {
                Polarity::Positive => &mut self.positive,
                Polarity::Negative => &mut self.negative,
            };
            set.insert(word);
            added += 1;
        }
        added
    }

    /// Display label for a theme code; unmapped codes display verbatim.
    pub fn theme_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.themes
            .iter()
            .find(|t| t.code == code)
            .map(|t| t.label.as_str())
            .unwrap_or(code)
    }

    /// Comma-separated theme codes, passed to the remote service as a hint.
    pub fn theme_hint(&self) -> String {
        self.themes
            .iter()
            .map(|t| t.code.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn normalize_word(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}
