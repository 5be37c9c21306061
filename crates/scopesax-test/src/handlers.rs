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

//! Handlers that record what they receive.
//!
//! [`RecordingHandler`] appends `enter <scope>` / `exit <scope>` to a shared
//! [`EventLog`] whenever a scope becomes active or retires, and builds an
//! [`ElementRecord`] tree out of the scopes it delegated.

use scopesax::{
    Attributes, CompletedScope, ParseError, ParseResult, QualifiedName, ScopeContext, ScopeHandler,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Ordered log shared by all handlers of one parse.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    /// Snapshot of the entries so far.
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// What a recording handler saw of its scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementRecord {
    /// Local name of the scope element
    pub name: String,
    /// Attributes of the scope element, in document order
    pub attributes: Vec<(String, String)>,
    /// Buffered text at the close of the scope element
    pub text: String,
    /// Records of delegated child scopes, in document order
    pub children: Vec<ElementRecord>,
}

impl ElementRecord {
    /// Value of the attribute written as `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of records in this tree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ElementRecord::count).sum::<usize>()
    }
}

fn attribute_pairs(attributes: &Attributes) -> Vec<(String, String)> {
    attributes
        .iter()
        .map(|a| (a.name.qualified_name(), a.value.clone()))
        .collect()
}

#[derive(Debug, Clone, Default)]
enum Delegation {
    #[default]
    Never,
    Names(Rc<Vec<String>>),
    All,
}

impl Delegation {
    fn wants(&self, local_name: &str) -> bool {
        match self {
            Delegation::Never => false,
            Delegation::Names(names) => names.iter().any(|n| n == local_name),
            Delegation::All => true,
        }
    }
}

/// A handler that logs its activity and records its scope.
///
/// As the root handler it is labelled with the name given to
/// [`new`](Self::new); delegated handlers are labelled with their element's
/// local name.
#[derive(Debug)]
pub struct RecordingHandler {
    label: String,
    log: EventLog,
    delegation: Delegation,
    fail_on: Option<Rc<str>>,
    record: ElementRecord,
}

impl RecordingHandler {
    /// A root handler logging as `label`.
    pub fn new(label: impl Into<String>, log: &EventLog) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
            delegation: Delegation::Never,
            fail_on: None,
            record: ElementRecord::default(),
        }
    }

    /// Delegate nested elements with any of these local names.
    pub fn delegate_on(mut self, names: &[&str]) -> Self {
        self.delegation = Delegation::Names(Rc::new(names.iter().map(|n| n.to_string()).collect()));
        self
    }

    /// Delegate every nested element.
    pub fn delegate_all(mut self) -> Self {
        self.delegation = Delegation::All;
        self
    }

    /// Fail with a handler error when an element with this local name opens.
    pub fn fail_on(mut self, name: &str) -> Self {
        self.fail_on = Some(Rc::from(name));
        self
    }

    pub fn record(&self) -> &ElementRecord {
        &self.record
    }

    fn child(&self, name: &QualifiedName, attributes: &Attributes) -> Self {
        Self {
            label: name.local_name().to_string(),
            log: self.log.clone(),
            delegation: self.delegation.clone(),
            fail_on: self.fail_on.clone(),
            record: ElementRecord {
                name: name.local_name().to_string(),
                attributes: attribute_pairs(attributes),
                ..ElementRecord::default()
            },
        }
    }
}

impl ScopeHandler for RecordingHandler {
    type Instance = ElementRecord;

    fn instance(&self) -> &ElementRecord {
        &self.record
    }

    fn into_instance(self) -> ElementRecord {
        self.record
    }

    fn start_element(
        &mut self,
        cx: &mut ScopeContext<'_>,
        name: &QualifiedName,
        attributes: &Attributes,
    ) -> ParseResult<()> {
        if self.fail_on.as_deref() == Some(name.local_name()) {
            return Err(ParseError::handler(format!(
                "{} refused element '{}'",
                self.label, name
            )));
        }

        // Only the root handler sees its own scope element open.
        if cx.position().is_boundary() {
            self.record.name = name.local_name().to_string();
            self.record.attributes = attribute_pairs(attributes);
            self.log.push(format!("enter {}", self.label));
            return Ok(());
        }

        if self.delegation.wants(name.local_name()) {
            let child = self.child(name, attributes);
            self.log.push(format!("enter {}", child.label));
            cx.delegate(child)?;
        }
        Ok(())
    }

    fn end_element(&mut self, cx: &mut ScopeContext<'_>, _name: &QualifiedName) -> ParseResult<()> {
        if cx.position().is_boundary() {
            self.record.text = cx.take_characters();
            self.log.push(format!("exit {}", self.label));
        }
        Ok(())
    }

    fn child_completed(&mut self, _cx: &mut ScopeContext<'_>, child: CompletedScope) -> ParseResult<()> {
        let record = child
            .into_instance::<ElementRecord>()
            .ok_or_else(|| ParseError::handler("child handler did not produce an ElementRecord"))?;
        self.record.children.push(record);
        Ok(())
    }
}
