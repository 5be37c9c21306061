// Dweve ScopeSAX - Scoped Event-Driven XML Parsing
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for reader construction and parsing.
//!
//! Failures fall into three classes:
//!
//! - **Initialization**: [`InitError`], returned when a reader or its schema
//!   cannot be built. Nothing has been parsed yet.
//! - **Validation**: [`ParseError::Validation`], a schema or well-formedness
//!   violation escalated by the active error policy.
//! - **Parse**: every other [`ParseError`] variant (I/O, encoding, markup
//!   syntax, handler failures).
//!
//! # Examples
//!
//! ```rust
//! use scopesax::{Diagnostic, ParseError, Severity};
//!
//! let err = ParseError::Validation(Diagnostic::new(
//!     Severity::Error,
//!     42,
//!     "/person/age",
//!     "Type validation failed for 'age': expected xs:integer, found 'thirty'",
//! ));
//! assert!(err.is_validation());
//! assert_eq!(err.position(), Some(42));
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// How serious a reported problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Suspicious input that is still processable.
    Warning,
    /// A validity violation; the parser could continue.
    Error,
    /// A well-formedness violation; parsing cannot continue.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
            Severity::Fatal => f.write_str("fatal error"),
        }
    }
}

/// A problem reported by the reader to the error policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the problem
    pub severity: Severity,
    /// Byte offset in the input where the problem was detected
    pub position: usize,
    /// Slash-separated local names of the open elements, e.g. `/root/item`
    pub path: String,
    /// Human readable description
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(
        severity: Severity,
        position: usize,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            position,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.severity, self.position)?;
        if !self.path.is_empty() {
            write!(f, " in {}", self.path)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Reader, factory or schema construction failed.
///
/// Returned synchronously when a session is created; not recoverable by
/// retrying with the same configuration.
#[derive(Error, Debug)]
pub enum InitError {
    /// A schema document is not well-formed XML.
    #[error("Schema parse error in {origin}: {message}")]
    SchemaParse { origin: String, message: String },

    /// A schema document uses constructs outside the supported subset or is
    /// structurally invalid.
    #[error("Invalid schema in {origin}: {message}")]
    InvalidSchema { origin: String, message: String },

    /// An import or include could not be satisfied locally.
    #[error("Unresolved schema reference '{location}': no local resource is mapped and network access is disabled")]
    UnresolvedReference { location: String },

    /// A file based schema source does not exist.
    #[error("Schema file not found: {}", .path.display())]
    SchemaNotFound { path: PathBuf },

    /// Reading a schema resource failed.
    #[error("I/O error reading schema {origin}: {message}")]
    Io { origin: String, message: String },

    /// Validating mode was requested without any schema.
    #[error("Validating reader requested without schema sources")]
    MissingSchema,
}

impl InitError {
    /// Create a schema structure error.
    #[inline]
    pub fn invalid_schema(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

/// Errors that abort a parse.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Schema or well-formedness violation escalated by the error policy.
    #[error("Validation failed: {0}")]
    Validation(Diagnostic),

    /// Reading the input failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid in its encoding.
    #[error("Malformed character data at position {position}: {message}")]
    Encoding { position: usize, message: String },

    /// The input declares an encoding the reader cannot decode.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// The tokenizer rejected the markup.
    #[error("XML syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// A scope handler aborted the parse.
    #[error("Handler error: {0}")]
    Handler(String),

    /// `parse` was called before a handler was installed.
    #[error("No active handler installed")]
    NoActiveHandler,
}

impl ParseError {
    /// Create a handler error, the way handler callbacks abort a parse.
    #[inline]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// Create a syntax error.
    #[inline]
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Whether this is a validation failure rather than a general parse failure.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The diagnostic behind a validation failure.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Validation(d) => Some(d),
            _ => None,
        }
    }

    /// Get the byte position if available.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Validation(d) => Some(d.position),
            Self::Encoding { position, .. } | Self::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
