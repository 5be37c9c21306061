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

//! Property-based tests for handler delegation
//!
//! # Properties Tested
//!
//! 1. **Balance**: every delegated scope is entered and exited exactly once,
//!    and never exited before it was entered
//! 2. **Structure**: the records built by delegated handlers mirror the
//!    element tree, including same-name nesting
//! 3. **Buffering**: text around delegated children stays with the parent

use proptest::prelude::*;
use scopesax::{InputSource, ReaderConfig, SaxParser, ScopeHandler};
use scopesax_test::{ElementRecord, EventLog, RecordingHandler};

#[derive(Debug, Clone)]
struct Tree {
    name: String,
    before: String,
    after: String,
    children: Vec<Tree>,
}

impl Tree {
    fn to_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        out.push('>');
        out.push_str(&self.before);
        for child in &self.children {
            child.to_xml(out);
        }
        out.push_str(&self.after);
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn expected(&self) -> ElementRecord {
        ElementRecord {
            name: self.name.clone(),
            attributes: Vec::new(),
            text: format!("{}{}", self.before, self.after),
            children: self.children.iter().map(Tree::expected).collect(),
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(Tree::count).sum::<usize>()
    }
}

fn tree() -> impl Strategy<Value = Tree> {
    let name = "[a-c]";
    let text = "[a-zA-Z0-9]{0,8}";
    let leaf = (name, text, text).prop_map(|(name, before, after)| Tree {
        name,
        before,
        after,
        children: Vec::new(),
    });
    leaf.prop_recursive(5, 48, 4, move |inner| {
        (name, text, text, prop::collection::vec(inner, 0..4)).prop_map(
            |(name, before, after, children)| Tree {
                name,
                before,
                after,
                children,
            },
        )
    })
}

fn parse_all_delegated(xml: &str) -> Result<(ElementRecord, Vec<String>), TestCaseError> {
    let log = EventLog::new();
    let mut parser =
        SaxParser::new(ReaderConfig::default()).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let root = parser
        .parse_with(
            RecordingHandler::new("root", &log).delegate_all(),
            InputSource::from_str(xml),
        )
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    Ok((root.into_instance(), log.entries()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every scope gets exactly one active period
    #[test]
    fn prop_enter_exit_balanced(tree in tree()) {
        let mut xml = String::new();
        tree.to_xml(&mut xml);
        let (_, log) = parse_all_delegated(&xml)?;

        prop_assert_eq!(log.len(), 2 * tree.count());
        let mut open = 0usize;
        for entry in &log {
            if entry.starts_with("enter ") {
                open += 1;
            } else {
                prop_assert!(open > 0, "exit before enter in {:?}", log);
                open -= 1;
            }
        }
        prop_assert_eq!(open, 0);
        prop_assert_eq!(log.first().map(String::as_str), Some("enter root"));
        prop_assert_eq!(log.last().map(String::as_str), Some("exit root"));
    }

    /// Property: delegated records mirror the document, text included
    #[test]
    fn prop_records_mirror_tree(tree in tree()) {
        let mut xml = String::new();
        tree.to_xml(&mut xml);
        let (record, _) = parse_all_delegated(&xml)?;

        prop_assert_eq!(record, tree.expected());
    }

    /// Property: without delegation the root only keeps text after the last open
    #[test]
    fn prop_undelegated_root_keeps_trailing_text(tree in tree()) {
        let mut xml = String::new();
        tree.to_xml(&mut xml);

        let log = EventLog::new();
        let mut parser = SaxParser::new(ReaderConfig::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let root = parser
            .parse_with(RecordingHandler::new("root", &log), InputSource::from_str(&xml))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(log.len(), 2);
        prop_assert!(root.record().children.is_empty());
        prop_assert!(root.record().text.ends_with(&tree.after));
    }
}
