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

//! Shared test fixtures and handlers for scopesax.
//!
//! Provides canonical XML documents and XSD schemas, handlers that record
//! the events they receive, and a small DIDL-Lite style object model whose
//! `desc` elements are captured into standalone metadata fragments.
//!
//! # Quick Start
//!
//! ```rust
//! use scopesax::{InputSource, ReaderConfig, SaxParser};
//! use scopesax_test::{fixtures, EventLog, RecordingHandler};
//!
//! scopesax_test::init_tracing();
//!
//! let log = EventLog::new();
//! let mut parser = SaxParser::new(ReaderConfig::default())?;
//! let root = parser.parse_with(
//!     RecordingHandler::new("root", &log).delegate_on(&["b"]),
//!     InputSource::from_str(fixtures::mixed_content()),
//! )?;
//!
//! assert_eq!(root.record().text, "text1text2");
//! assert_eq!(log.entries(), vec!["enter root", "enter b", "exit b", "exit root"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod desc;
pub mod fixtures;
pub mod handlers;

pub use desc::{
    DescHandler, DescMeta, DidlHandler, DidlObject, Fragment, FragmentHandler, FragmentNode,
    ItemHandler,
};
pub use handlers::{ElementRecord, EventLog, RecordingHandler};

use tracing_subscriber::{fmt, EnvFilter};

/// Type alias for a list of document fixtures (name, xml text).
pub type FixtureList = Vec<(&'static str, &'static str)>;

/// Install a test-friendly tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `scopesax=trace`. Calling
/// this more than once is harmless.
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scopesax=trace")),
        )
        .with_target(true)
        .with_test_writer()
        .try_init();
}
