pub mod json_loader;

pub use json_loader::{load_corpus, load_corpus_file};
