pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod lex;
pub mod options;
pub mod reformat;
pub mod report;
pub mod syntax;

pub use editor::{EditableDocument, InMemoryDocument, OutputSurface, Selection};
pub use engine::{FormatEngine, ProcessEngine};
pub use error::StyleError;
