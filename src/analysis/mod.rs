// Core analysis engine: lexicons, classification, keyword extraction,
// batch orchestration, remote adapter and the training feedback loop.
pub mod batch;
pub mod classifier;
pub mod export;
pub mod ingest;
pub mod keywords;
pub mod lexicon;
pub mod remote;
pub mod training;

pub use batch::{analyze, AnalysisResult, Backend, BatchOptions};
pub use classifier::Sentiment;
pub use export::{to_csv, to_json, FilterState};
pub use ingest::{read_training_file, read_verbatims, split_lines, summarize_training};
pub use lexicon::{Lexicon, Polarity};
pub use remote::RemoteClassifier;
pub use training::{apply_feedback, SharedLexicon};
