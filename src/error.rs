//! Error types for decoding and bean mapping.
//!
//! Two kinds of failure are meant for callers to handle:
//!
//! - **Syntax errors**: malformed input text, reported with the character offset
//!   where the tokenizer gave up
//! - **Beanification errors**: a [`Value`](crate::Value) graph that does not fit the
//!   requested target type, reported with the target type name and, when a
//!   constructor or setter failed, the underlying cause
//!
//! Misuse that indicates a bug in the calling code (encoding a NaN, a bean table
//! with partially annotated constructor parameters) panics instead.
//!
//! ## Examples
//!
//! ```rust
//! use beanson::{decode, Error};
//!
//! let result = decode("{\"x\": [1, 2");
//! match result {
//!     Err(Error::Syntax { offset, .. }) => assert!(offset > 0),
//!     other => panic!("expected a syntax error, got {:?}", other),
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The underlying failure raised by a bean constructor or setter.
pub type Cause = Arc<dyn StdError + Send + Sync>;

/// Represents all possible errors raised by decoding, bean mapping and the serde bridge.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed input text
    #[error("{msg} on character {offset}")]
    Syntax { offset: usize, msg: String },

    /// Structural mismatch between a value graph and a target type
    #[error("{msg} (bean {target})")]
    Beanification {
        msg: String,
        target: String,
        #[source]
        cause: Option<Cause>,
    },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Unsupported type in the serde bridge
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error at the given character offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::Error;
    ///
    /// let err = Error::syntax("Unterminated string", 7);
    /// assert_eq!(err.to_string(), "Unterminated string on character 7");
    /// ```
    pub fn syntax(msg: impl Into<String>, offset: usize) -> Self {
        Error::Syntax {
            offset,
            msg: msg.into(),
        }
    }

    /// Creates a beanification error for the named target type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::Error;
    ///
    /// let err = Error::beanification("Expected a map", "Point");
    /// assert_eq!(err.to_string(), "Expected a map (bean Point)");
    /// ```
    pub fn beanification(msg: impl Into<String>, target: &str) -> Self {
        Error::Beanification {
            msg: msg.into(),
            target: target.to_string(),
            cause: None,
        }
    }

    /// Creates a beanification error that wraps the failure of a constructor or setter.
    pub fn beanification_caused(
        msg: impl Into<String>,
        target: &str,
        cause: Box<dyn StdError + Send + Sync>,
    ) -> Self {
        Error::Beanification {
            msg: msg.into(),
            target: target.to_string(),
            cause: Some(Arc::from(cause)),
        }
    }

    /// Creates an unsupported type error for the serde bridge.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors raised by the tokenizer.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// Returns `true` for errors raised while mapping values onto types.
    #[must_use]
    pub fn is_beanification(&self) -> bool {
        matches!(self, Error::Beanification { .. })
    }

    /// The character offset of a syntax error.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Syntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// The target type name of a beanification error.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Error::Beanification { target, .. } => Some(target),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
