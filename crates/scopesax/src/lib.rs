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

//! ScopeSAX: event-driven XML parsing with scoped handlers
//!
//! Parses XML as a stream of events and lets each element scope be handled
//! by its own handler, which can hand nested scopes to child handlers and
//! gets them back, populated, when they end.
//!
//! # Features
//!
//! - Namespace-aware push reader on top of `quick-xml`
//! - **Scoped handler chain**: delegate a nested element to a child handler;
//!   control returns to the parent when the element closes
//! - **XSD validation** against a compiled schema subset, with bundled
//!   `xml.xsd` so imports of the XML namespace never touch the network
//! - **Factory cache** shared between threads: one immutable factory per
//!   validation mode and a bounded cache of compiled schemas
//! - Fail-fast error policy by default, replaceable per session
//!
//! # Examples
//!
//! ## Parsing with a single handler
//!
//! ```rust
//! use scopesax::{
//!     Attributes, InputSource, ParseResult, QualifiedName, ReaderConfig, SaxParser,
//!     ScopeContext, ScopeHandler,
//! };
//!
//! #[derive(Default)]
//! struct Titles(Vec<String>);
//!
//! impl ScopeHandler for Titles {
//!     type Instance = Vec<String>;
//!
//!     fn instance(&self) -> &Vec<String> {
//!         &self.0
//!     }
//!
//!     fn into_instance(self) -> Vec<String> {
//!         self.0
//!     }
//!
//!     fn end_element(&mut self, cx: &mut ScopeContext<'_>, name: &QualifiedName) -> ParseResult<()> {
//!         if name.local_name() == "title" {
//!             self.0.push(cx.take_characters());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let xml = "<library><book><title>Dune</title></book><book><title>Emma</title></book></library>";
//! let mut parser = SaxParser::new(ReaderConfig::default())?;
//! let titles = parser.parse_with(Titles::default(), InputSource::from_str(xml))?;
//! assert_eq!(titles.0, vec!["Dune", "Emma"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Validating
//!
//! ```rust
//! use scopesax::{InputSource, ReaderConfig, SaxParser, SchemaSource, ScopeHandler};
//!
//! #[derive(Debug)]
//! struct Ignore;
//!
//! impl ScopeHandler for Ignore {
//!     type Instance = ();
//!
//!     fn instance(&self) -> &() {
//!         &()
//!     }
//!
//!     fn into_instance(self) {}
//! }
//!
//! let xsd = r#"<?xml version="1.0"?>
//! <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:element name="person">
//!     <xs:complexType>
//!       <xs:sequence>
//!         <xs:element name="name" type="xs:string"/>
//!         <xs:element name="age" type="xs:integer"/>
//!       </xs:sequence>
//!     </xs:complexType>
//!   </xs:element>
//! </xs:schema>"#;
//!
//! let config = ReaderConfig::default().with_schema(SchemaSource::from_xsd(xsd));
//! let mut parser = SaxParser::new(config)?;
//!
//! let xml = "<person><name>Alice</name><age>thirty</age></person>";
//! let err = parser.parse_with(Ignore, InputSource::from_str(xml)).unwrap_err();
//! assert!(err.is_validation());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Delegating scopes
//!
//! See the [`handler`] module.

pub mod error;
pub mod error_policy;
pub mod event;
pub mod factory;
pub mod handler;
pub mod input;
mod namespace;
pub mod reader;
pub mod schema;
pub mod session;

pub use error::{Diagnostic, InitError, ParseError, ParseResult, Severity};
pub use error_policy::{CollectingErrorHandler, ErrorHandler, FailFast};
pub use event::{Attribute, Attributes, QualifiedName};
pub use factory::{FactoryCache, ReaderConfig, ReaderFactory, ValidationMode};
pub use handler::{CompletedScope, HandlerChain, ScopeContext, ScopeHandler, ScopePosition};
pub use input::InputSource;
pub use namespace::XML_NAMESPACE;
pub use reader::{ContentHandler, XmlReader};
pub use schema::{Schema, SchemaSource};
pub use session::SaxParser;
