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

//! Parser sessions.

use crate::error::{InitError, ParseError, ParseResult};
use crate::error_policy::{ErrorHandler, FailFast};
use crate::factory::{FactoryCache, ReaderConfig};
use crate::handler::{CompletedScope, HandlerChain, ScopeHandler};
use crate::input::InputSource;
use crate::reader::XmlReader;
use std::fmt;
use tracing::debug;

/// One parser: a reader, the root handler and the error policy.
///
/// A session is single-threaded. Build one per thread from a shared
/// [`FactoryCache`]; the compiled schema is shared, the session is not.
pub struct SaxParser {
    reader: XmlReader,
    chain: Option<HandlerChain>,
    completed: Option<CompletedScope>,
    error_handler: Box<dyn ErrorHandler>,
}

impl SaxParser {
    /// Create a session using the process-wide factory cache.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if the configured schema cannot be compiled.
    pub fn new(config: ReaderConfig) -> Result<Self, InitError> {
        Self::with_factory(FactoryCache::global(), config)
    }

    /// Create a session using `factory`.
    pub fn with_factory(factory: &FactoryCache, config: ReaderConfig) -> Result<Self, InitError> {
        let reader = factory.build_reader(&config)?;
        Ok(Self {
            reader,
            chain: None,
            completed: None,
            error_handler: Box::new(FailFast),
        })
    }

    pub fn reader(&self) -> &XmlReader {
        &self.reader
    }

    pub fn is_validating(&self) -> bool {
        self.reader.is_validating()
    }

    /// Install the handler that receives the document element.
    ///
    /// Replaces any handler left from an earlier parse.
    pub fn set_active_handler<H: ScopeHandler>(&mut self, handler: H) {
        self.chain = Some(HandlerChain::new(handler));
        self.completed = None;
    }

    /// Replace the error policy; the default is [`FailFast`].
    pub fn set_error_handler<E: ErrorHandler + 'static>(&mut self, handler: E) {
        self.error_handler = Box::new(handler);
    }

    /// Parse `input` with the installed handler and error policy.
    ///
    /// On success the root handler is kept for [`take_handler`](Self::take_handler).
    /// On failure it is dropped.
    ///
    /// # Errors
    ///
    /// [`ParseError::NoActiveHandler`] if no handler is installed, otherwise
    /// the first failure raised while reading.
    pub fn parse(&mut self, input: InputSource<'_>) -> ParseResult<()> {
        let mut chain = self.chain.take().ok_or(ParseError::NoActiveHandler)?;
        self.reader
            .parse(input, &mut chain, self.error_handler.as_mut())?;
        self.completed = chain.into_completed();
        Ok(())
    }

    /// Like [`parse`](Self::parse), with a one-off error policy.
    pub fn parse_with_error_handler(
        &mut self,
        input: InputSource<'_>,
        error_handler: &mut dyn ErrorHandler,
    ) -> ParseResult<()> {
        let mut chain = self.chain.take().ok_or(ParseError::NoActiveHandler)?;
        self.reader.parse(input, &mut chain, error_handler)?;
        self.completed = chain.into_completed();
        Ok(())
    }

    /// The root handler of the last successful parse, if it is an `H`.
    pub fn take_handler<H: ScopeHandler>(&mut self) -> Option<H> {
        let completed = self.completed.take()?;
        if !completed.is::<H>() {
            self.completed = Some(completed);
            return None;
        }
        completed.downcast::<H>()
    }

    /// The root handler of the last successful parse.
    pub fn completed_handler(&self) -> Option<&CompletedScope> {
        self.completed.as_ref()
    }

    /// Install `handler`, parse `input` and return the handler.
    pub fn parse_with<H: ScopeHandler>(&mut self, handler: H, input: InputSource<'_>) -> ParseResult<H> {
        self.set_active_handler(handler);
        self.parse(input)?;
        debug!(
            "Parse finished, root handler {}",
            self.completed
                .as_ref()
                .map_or("<none>", CompletedScope::type_name)
        );
        self.take_handler::<H>().ok_or(ParseError::NoActiveHandler)
    }
}

impl fmt::Debug for SaxParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaxParser")
            .field("reader", &self.reader)
            .field("chain", &self.chain)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_policy::CollectingErrorHandler;
    use crate::event::{Attributes, QualifiedName};
    use crate::handler::ScopeContext;
    use crate::schema::SchemaSource;

    #[derive(Default)]
    struct Names(Vec<String>);

    impl ScopeHandler for Names {
        type Instance = Vec<String>;

        fn instance(&self) -> &Vec<String> {
            &self.0
        }

        fn into_instance(self) -> Vec<String> {
            self.0
        }

        fn start_element(
            &mut self,
            _cx: &mut ScopeContext<'_>,
            name: &QualifiedName,
            _attributes: &Attributes,
        ) -> ParseResult<()> {
            self.0.push(name.local_name().to_string());
            Ok(())
        }
    }

    const NOTE_SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="note">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="to" type="xs:string"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    fn validating() -> SaxParser {
        let cache = FactoryCache::new(4);
        let config = ReaderConfig::default().with_schema(SchemaSource::from_xsd(NOTE_SCHEMA));
        SaxParser::with_factory(&cache, config).unwrap()
    }

    #[test]
    fn test_parse_without_handler() {
        let mut parser = SaxParser::new(ReaderConfig::default()).unwrap();
        let result = parser.parse(InputSource::from_str("<a/>"));
        assert!(matches!(result, Err(ParseError::NoActiveHandler)));
    }

    #[test]
    fn test_parse_with_returns_root() {
        let mut parser = SaxParser::new(ReaderConfig::default()).unwrap();
        assert!(!parser.is_validating());
        let names = parser
            .parse_with(Names::default(), InputSource::from_str("<a><b/><c/></a>"))
            .unwrap();
        assert_eq!(names.0, vec!["a", "b", "c"]);

        // The handler is consumed by a parse.
        let again = parser.parse(InputSource::from_str("<a/>"));
        assert!(matches!(again, Err(ParseError::NoActiveHandler)));
    }

    #[test]
    fn test_take_handler_with_wrong_type_keeps_root() {
        let mut parser = SaxParser::new(ReaderConfig::default()).unwrap();
        parser.set_active_handler(Names::default());
        parser.parse(InputSource::from_str("<a/>")).unwrap();

        struct Other;
        impl ScopeHandler for Other {
            type Instance = ();
            fn instance(&self) -> &() {
                &()
            }
            fn into_instance(self) {}
        }

        assert!(parser.take_handler::<Other>().is_none());
        assert!(parser.completed_handler().is_some());
        assert!(parser.take_handler::<Names>().is_some());
    }

    #[test]
    fn test_fail_fast_by_default() {
        let mut parser = validating();
        assert!(parser.is_validating());
        parser.set_active_handler(Names::default());
        let err = parser
            .parse(InputSource::from_str("<note><from>x</from></note>"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(parser.take_handler::<Names>().is_none());
    }

    #[test]
    fn test_collecting_error_handler() {
        let mut parser = validating();
        parser.set_active_handler(Names::default());
        let mut errors = CollectingErrorHandler::new();
        parser
            .parse_with_error_handler(InputSource::from_str("<note><from>x</from></note>"), &mut errors)
            .unwrap();
        assert!(errors.has_errors());
        assert_eq!(
            parser.take_handler::<Names>().map(|n| n.0),
            Some(vec!["note".to_string(), "from".to_string()])
        );
    }

    #[test]
    fn test_set_error_handler() {
        let mut parser = validating();
        parser.set_error_handler(CollectingErrorHandler::new());
        let names = parser
            .parse_with(Names::default(), InputSource::from_str("<note><to>x</to><to>y</to></note>"))
            .unwrap();
        assert_eq!(names.0.len(), 3);
    }
}
