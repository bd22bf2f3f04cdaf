//! File I/O for notes: reading sources, walking folders, writing destinations

pub mod reader;
pub mod writer;

pub use reader::{DocumentReader, ReaderConfig};
pub use writer::{DocumentWriter, OutputTarget, WriteResult};
