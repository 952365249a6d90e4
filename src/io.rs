//! Reader/Writer traits and format dispatch
//!
//! Readers turn a graph document into [`GraphData`]; writers turn final
//! [`NodePosition`]s into an output document. A [`FormatRegistry`] picks the
//! right one from a file extension or format id.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::{GraphData, GraphError, NodePosition};

/// Errors that can occur during reading or writing
#[derive(Error, Debug)]
pub enum IoError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),

    /// The document parsed but describes an unusable graph
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),

    /// A serialization error occurred
    #[error("write error: {0}")]
    Write(String),
}

/// Result type for reader/writer operations
pub type IoResult<T> = Result<T, IoError>;

/// A reader parses an input document into [`GraphData`]
pub trait Reader {
    /// Parse a document held in memory
    fn parse(&self, content: &str) -> IoResult<GraphData>;

    /// File extensions this reader can handle (e.g., ["yaml", "yml"])
    fn supported_extensions(&self) -> &[&str];

    /// Read and parse a file
    fn read(&self, input: &Path) -> IoResult<GraphData> {
        let content = fs::read_to_string(input)?;
        self.parse(&content)
    }

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// A writer serializes final positions to a specific format
pub trait Writer {
    /// Serialize positions to a string
    fn render(&self, positions: &[NodePosition]) -> IoResult<String>;

    /// Identifier for this output format (e.g., "json", "yaml")
    fn format_id(&self) -> &str;

    /// Serialize positions and write them to `output`
    fn write(&self, positions: &[NodePosition], output: &Path) -> IoResult<()> {
        let rendered = self.render(positions)?;
        fs::write(output, rendered)?;
        Ok(())
    }
}

/// JSON graphs in, pretty-printed JSON positions out
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl Reader for JsonFormat {
    fn parse(&self, content: &str) -> IoResult<GraphData> {
        let graph: GraphData =
            serde_json::from_str(content).map_err(|e| IoError::Parse(e.to_string()))?;
        graph.validate()?;
        Ok(graph)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

impl Writer for JsonFormat {
    fn render(&self, positions: &[NodePosition]) -> IoResult<String> {
        let mut out =
            serde_json::to_string_pretty(positions).map_err(|e| IoError::Write(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }

    fn format_id(&self) -> &str {
        "json"
    }
}

/// YAML graphs in, YAML positions out
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlFormat;

impl Reader for YamlFormat {
    fn parse(&self, content: &str) -> IoResult<GraphData> {
        let graph: GraphData =
            serde_yaml::from_str(content).map_err(|e| IoError::Parse(e.to_string()))?;
        graph.validate()?;
        Ok(graph)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

impl Writer for YamlFormat {
    fn render(&self, positions: &[NodePosition]) -> IoResult<String> {
        serde_yaml::to_string(positions).map_err(|e| IoError::Write(e.to_string()))
    }

    fn format_id(&self) -> &str {
        "yaml"
    }
}

/// Registry of available readers and writers
pub struct FormatRegistry {
    readers: Vec<Box<dyn Reader>>,
    writers: Vec<Box<dyn Writer>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// Create a registry with JSON and YAML readers and writers registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_reader(Box::new(JsonFormat));
        registry.register_reader(Box::new(YamlFormat));
        registry.register_writer(Box::new(JsonFormat));
        registry.register_writer(Box::new(YamlFormat));
        registry
    }

    pub fn register_reader(&mut self, reader: Box<dyn Reader>) {
        self.readers.push(reader);
    }

    pub fn register_writer(&mut self, writer: Box<dyn Writer>) {
        self.writers.push(writer);
    }

    /// Find a reader for the given file extension
    pub fn reader_for_extension(&self, ext: &str) -> Option<&dyn Reader> {
        self.readers
            .iter()
            .find(|r| r.supports_extension(ext))
            .map(|r| r.as_ref())
    }

    /// Find a writer by format ID
    pub fn writer_for_format(&self, format_id: &str) -> Option<&dyn Writer> {
        self.writers
            .iter()
            .find(|w| w.format_id().eq_ignore_ascii_case(format_id))
            .map(|w| w.as_ref())
    }

    /// Get file extension from a path
    pub fn extension_from_path(path: &Path) -> Option<&str> {
        path.extension().and_then(|e| e.to_str())
    }

    /// Find a reader for the given path based on its extension
    pub fn reader_for_path(&self, path: &Path) -> IoResult<&dyn Reader> {
        let ext = Self::extension_from_path(path)
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;

        self.reader_for_extension(ext)
            .ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }

    /// Find a writer for the given path, treating `yml` as `yaml`
    pub fn writer_for_path(&self, path: &Path) -> IoResult<&dyn Writer> {
        let ext = Self::extension_from_path(path)
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;
        let format_id = if ext.eq_ignore_ascii_case("yml") {
            "yaml"
        } else {
            ext
        };

        self.writer_for_format(format_id)
            .ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }
}
