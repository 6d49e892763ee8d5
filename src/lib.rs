//! VDYP Control Library
//!
//! A Rust library for reading the fixed-column control files that configure the
//! VDYP forest growth and yield projection engine, and for exposing the coefficient
//! tables they reference through a typed, eagerly resolved lookup layer.
//!
//! This library provides tools for:
//! - Converting fixed-width text tokens into typed values with descriptive errors
//! - Slicing line-oriented resources into named fields and folding them into tables
//! - Storing coefficients in 2-D and 3-D matrix maps keyed by species, BEC zone and region
//! - Resolving control file references into parsed sub-resources in a fixed phase order
//! - Reconciling utilization class basal area, density and diameter vectors

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod coefficient_parsers;
        pub mod control_map;
        pub mod line_parser;
        pub mod reconciliation;
        pub mod resolved_control_map;
        pub mod value_parser;
    }
    pub mod adapters {
        pub mod file_resolver;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::adapters::file_resolver::{FileResolver, FileSystemResolver, MemoryResolver};
pub use app::models::{Coefficients, MatrixMap2, MatrixMap3, Region, UtilizationClass, UtilizationVector};
pub use app::services::control_map::{ControlKey, ControlMap, ControlParser, ControlValue};
pub use app::services::resolved_control_map::ResolvedControlMap;
pub use app::services::value_parser::ValueParseError;
pub use config::{ControlParserConfig, VdypApplication};

/// Result type alias for control file processing
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for control file parsing, resolution and reconciliation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A single token could not be converted
    #[error(transparent)]
    ValueParse(#[from] ValueParseError),

    /// A line of a resource could not be parsed
    #[error("Error at line {line}{}: {source}", field_suffix(.field))]
    LineParse {
        line: usize,
        field: Option<String>,
        #[source]
        source: Box<Error>,
    },

    /// A named sub-resource could not be parsed
    #[error("Error while reading resource {resource}: {source}")]
    ResourceParse {
        resource: String,
        #[source]
        source: Box<Error>,
    },

    /// A resource parsed line by line but failed whole-file validation
    #[error("Validation failed: {message}")]
    ResourceValidation { message: String },

    /// A required control map entry was never populated
    #[error("Expected {key}({}) but it was not present", sequence_label(*.sequence))]
    MissingControl { key: String, sequence: Option<u32> },

    /// A control map entry holds a value of the wrong shape
    #[error(
        "Control {key}({}) was expected to be {expected} but was {found}",
        sequence_label(*.sequence)
    )]
    UnexpectedControlType {
        key: String,
        sequence: Option<u32>,
        expected: String,
        found: String,
    },

    /// A named resource could not be located
    #[error("Resource not found: {name}")]
    ResourceNotFound { name: String },

    /// Utilization reconciliation could not restore consistency
    #[error("Reconciliation error: {message}")]
    Reconciliation { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" (field {})", name),
        None => String::new(),
    }
}

fn sequence_label(sequence: Option<u32>) -> String {
    match sequence {
        Some(seq) => seq.to_string(),
        None => "-".to_string(),
    }
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Wrap an error with the physical line number it occurred on
    pub fn line_parse(line: usize, field: Option<&str>, source: Error) -> Self {
        Self::LineParse {
            line,
            field: field.map(str::to_string),
            source: Box::new(source),
        }
    }

    /// Wrap an error with the described name of the resource being read
    pub fn resource_parse(resource: impl Into<String>, source: Error) -> Self {
        Self::ResourceParse {
            resource: resource.into(),
            source: Box::new(source),
        }
    }

    /// Create a whole-resource validation error
    pub fn resource_validation(message: impl Into<String>) -> Self {
        Self::ResourceValidation {
            message: message.into(),
        }
    }

    /// Create a missing control entry error
    pub fn missing_control(key: ControlKey) -> Self {
        Self::MissingControl {
            key: key.name().to_string(),
            sequence: key.sequence(),
        }
    }

    /// Create an error for a control entry holding an unexpected value shape
    pub fn unexpected_control_type(
        key: ControlKey,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedControlType {
            key: key.name().to_string(),
            sequence: key.sequence(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a resource not found error
    pub fn resource_not_found(name: impl Into<String>) -> Self {
        Self::ResourceNotFound { name: name.into() }
    }

    /// Create a reconciliation error
    pub fn reconciliation(message: impl Into<String>) -> Self {
        Self::Reconciliation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a value parse error for a token
    pub fn value_parse(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValueParse(ValueParseError::new(value, message))
    }

    /// The innermost error, skipping line and resource wrappers
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::LineParse { source, .. } | Self::ResourceParse { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
