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

//! Error policies deciding what happens to reported problems.
//!
//! The reader never decides on its own whether a warning or a validity error
//! aborts the parse; it hands every [`Diagnostic`] to an [`ErrorHandler`].
//! The default, [`FailFast`], turns each one into a
//! [`ParseError::Validation`]. Fatal diagnostics abort the parse whatever the
//! policy returns.

use crate::error::{Diagnostic, ParseError, ParseResult, Severity};
use tracing::warn;

/// Receives problems found while reading.
///
/// Returning `Err` aborts the parse with that error; returning `Ok` lets
/// the reader continue (except after a fatal error).
pub trait ErrorHandler {
    /// Suspicious but processable input.
    fn warning(&mut self, diagnostic: Diagnostic) -> ParseResult<()>;

    /// A validity violation.
    fn error(&mut self, diagnostic: Diagnostic) -> ParseResult<()>;

    /// A well-formedness violation.
    fn fatal_error(&mut self, diagnostic: Diagnostic) -> ParseResult<()>;
}

/// Escalates every report into an aborting [`ParseError::Validation`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FailFast;

impl ErrorHandler for FailFast {
    fn warning(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        Err(ParseError::Validation(diagnostic))
    }

    fn error(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        Err(ParseError::Validation(diagnostic))
    }

    fn fatal_error(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        Err(ParseError::Validation(diagnostic))
    }
}

/// Records warnings and errors and lets the parse continue.
///
/// Useful for reporting every validity problem of a document in one pass.
///
/// # Example
///
/// ```rust
/// use scopesax::{CollectingErrorHandler, Diagnostic, ErrorHandler, Severity};
///
/// let mut errors = CollectingErrorHandler::new();
/// errors.error(Diagnostic::new(Severity::Error, 0, "/a", "bad")).unwrap();
/// assert!(errors.has_errors());
/// assert_eq!(errors.diagnostics().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct CollectingErrorHandler {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingErrorHandler {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether anything above warning level was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity != Severity::Warning)
    }

    /// Consume the collector.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorHandler for CollectingErrorHandler {
    fn warning(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn error(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn fatal_error(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        self.diagnostics.push(diagnostic.clone());
        Err(ParseError::Validation(diagnostic))
    }
}

impl<H: ErrorHandler + ?Sized> ErrorHandler for Box<H> {
    fn warning(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        (**self).warning(diagnostic)
    }

    fn error(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        (**self).error(diagnostic)
    }

    fn fatal_error(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        (**self).fatal_error(diagnostic)
    }
}

/// Route a diagnostic to the handler method matching its severity.
///
/// A fatal diagnostic always yields `Err`, even if the policy accepts it.
pub(crate) fn report(handler: &mut dyn ErrorHandler, diagnostic: Diagnostic) -> ParseResult<()> {
    match diagnostic.severity {
        Severity::Warning => handler.warning(diagnostic),
        Severity::Error => handler.error(diagnostic),
        Severity::Fatal => Err(escalate_fatal(handler, diagnostic)),
    }
}

/// Report a fatal diagnostic and produce the error that ends the parse.
pub(crate) fn escalate_fatal(handler: &mut dyn ErrorHandler, diagnostic: Diagnostic) -> ParseError {
    match handler.fatal_error(diagnostic.clone()) {
        Err(e) => e,
        Ok(()) => ParseError::Validation(diagnostic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(severity: Severity) -> Diagnostic {
        Diagnostic::new(severity, 10, "/root", "problem")
    }

    /// Accepts everything, including fatal errors.
    struct Permissive;

    impl ErrorHandler for Permissive {
        fn warning(&mut self, _: Diagnostic) -> ParseResult<()> {
            Ok(())
        }
        fn error(&mut self, _: Diagnostic) -> ParseResult<()> {
            Ok(())
        }
        fn fatal_error(&mut self, _: Diagnostic) -> ParseResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fail_fast_escalates_every_severity() {
        for severity in [Severity::Warning, Severity::Error, Severity::Fatal] {
            let result = report(&mut FailFast, diag(severity));
            match result {
                Err(ParseError::Validation(d)) => assert_eq!(d.severity, severity),
                other => panic!("Expected validation failure, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_collecting_continues_on_errors() {
        let mut collector = CollectingErrorHandler::new();
        assert!(report(&mut collector, diag(Severity::Warning)).is_ok());
        assert!(!collector.has_errors());
        assert!(report(&mut collector, diag(Severity::Error)).is_ok());
        assert!(collector.has_errors());
        assert_eq!(collector.diagnostics().len(), 2);
    }

    #[test]
    fn test_collecting_aborts_on_fatal() {
        let mut collector = CollectingErrorHandler::new();
        let result = report(&mut collector, diag(Severity::Fatal));
        assert!(matches!(result, Err(ParseError::Validation(_))));
        assert_eq!(collector.into_diagnostics().len(), 1);
    }

    #[test]
    fn test_fatal_aborts_even_when_accepted() {
        let result = report(&mut Permissive, diag(Severity::Fatal));
        assert!(matches!(result, Err(ParseError::Validation(_))));
        assert!(report(&mut Permissive, diag(Severity::Error)).is_ok());
    }

    #[test]
    fn test_boxed_handler_delegates() {
        let mut boxed: Box<dyn ErrorHandler> = Box::new(FailFast);
        assert!(report(&mut boxed, diag(Severity::Warning)).is_err());
    }
}
