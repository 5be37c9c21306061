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

//! Canonical documents and schemas.
//!
//! - **documents**: well-formed XML documents, valid and invalid
//! - **schemas**: XSD sources matching the documents
//! - **errors**: malformed documents and the failure they should raise

mod documents;
pub mod errors;
pub mod schemas;

pub use documents::*;

use crate::FixtureList;

/// All well-formed documents, for running the same test across each.
pub fn all() -> FixtureList {
    vec![
        ("didl_lite", didl_lite()),
        ("person_valid", person_valid()),
        ("person_invalid_age", person_invalid_age()),
        ("person_missing_name", person_missing_name()),
        ("mixed_content", mixed_content()),
        ("nested_mixed_content", nested_mixed_content()),
        ("recursive_nodes", recursive_nodes()),
        ("attribute_snapshot", attribute_snapshot()),
        ("namespaced", namespaced()),
        ("library", library()),
    ]
}
