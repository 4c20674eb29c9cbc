pub mod catalogue;
pub mod corpus;
pub mod loaders;
pub mod question;
pub mod worksheet;

pub use corpus::{CorpusFile, QuestionCorpus};
pub use loaders::{load_corpus, load_corpus_file};
pub use question::{CorpusQuestion, Difficulty, PaperRef};
pub use worksheet::{AnswerSet, Worksheet, WorksheetMode};
