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

//! Streaming validation of reader events against a compiled [`Schema`].
//!
//! The validator sees the same start/characters/end events the content
//! handler sees, one frame per open element, and reports findings instead
//! of failing. Whether a finding aborts the parse is up to the error policy.

use super::{
    ComplexType, ParticleState, ResolvedType, Schema, SimpleCheck, Term, TypeRef, XSI_NAMESPACE,
};
use crate::error::Severity;
use crate::event::{Attributes, QualifiedName};

/// A problem found by the validator, positioned later by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }
}

enum Frame<'s> {
    Simple {
        name: String,
        check: SimpleCheck<'s>,
        text: String,
    },
    Complex {
        name: String,
        ct: &'s ComplexType,
        state: ParticleState,
        /// Set once a child was out of place; the end-of-content check is skipped
        failed: bool,
        text: String,
        text_reported: bool,
    },
    /// Content is not checked: wildcard match, `xs:anyType` or an earlier error
    Skip,
}

pub(crate) struct Validator<'s> {
    schema: &'s Schema,
    stack: Vec<Frame<'s>>,
}

impl<'s> Validator<'s> {
    pub(crate) fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            stack: Vec::new(),
        }
    }

    pub(crate) fn start_element(&mut self, name: &QualifiedName, attrs: &Attributes) -> Vec<Finding> {
        let schema = self.schema;
        let mut findings = Vec::new();
        let local = name.local_name();

        let type_ref: Option<&'s TypeRef> = match self.stack.last_mut() {
            None => match schema.global_element(name.namespace(), local) {
                Some(decl) => Some(&decl.type_ref),
                None => {
                    findings.push(Finding::error(format!(
                        "Unknown element '{}' not defined in schema",
                        local
                    )));
                    None
                }
            },
            Some(Frame::Skip) => None,
            Some(Frame::Simple { name: parent, .. }) => {
                findings.push(Finding::error(format!(
                    "Unknown element '{}' not allowed in '{}'",
                    local, parent
                )));
                None
            }
            Some(Frame::Complex {
                name: parent,
                ct,
                state,
                failed,
                ..
            }) => {
                let ct: &'s ComplexType = *ct;
                let accepted = ct
                    .content
                    .as_ref()
                    .and_then(|particle| state.accept(particle, name));
                match (accepted, &ct.content) {
                    (Some(term), _) => term_type(schema, term, &mut findings),
                    (None, Some(particle)) if particle.find_element(name).is_some() => {
                        *failed = true;
                        findings.push(Finding::error(unexpected_message(
                            local,
                            parent,
                            &state.expected(particle),
                        )));
                        particle
                            .find_element(name)
                            .and_then(|term| term_type(schema, term, &mut findings))
                    }
                    (None, _) => {
                        *failed = true;
                        findings.push(Finding::error(format!(
                            "Unknown element '{}' not allowed in '{}'",
                            local, parent
                        )));
                        None
                    }
                }
            }
        };

        let frame = match type_ref.map(|t| schema.resolve_type(t)) {
            None | Some(ResolvedType::Any) => Frame::Skip,
            Some(ResolvedType::Unknown(type_name)) => {
                findings.push(Finding::warning(format!(
                    "Type '{}' of element '{}' is not defined in schema; content not checked",
                    type_name, local
                )));
                Frame::Skip
            }
            Some(ResolvedType::Simple(check)) => {
                for attr in attrs.iter().filter(|a| a.name.namespace() != Some(XSI_NAMESPACE)) {
                    findings.push(Finding::error(format!(
                        "Attribute '{}' is not declared for element '{}'",
                        attr.name, local
                    )));
                }
                Frame::Simple {
                    name: local.to_string(),
                    check,
                    text: String::new(),
                }
            }
            Some(ResolvedType::Complex(ct)) => {
                self.check_attributes(ct, local, attrs, &mut findings);
                Frame::Complex {
                    name: local.to_string(),
                    ct,
                    state: ParticleState::default(),
                    failed: false,
                    text: String::new(),
                    text_reported: false,
                }
            }
        };

        self.stack.push(frame);
        findings
    }

    pub(crate) fn characters(&mut self, chunk: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        match self.stack.last_mut() {
            Some(Frame::Simple { text, .. }) => text.push_str(chunk),
            Some(Frame::Complex {
                name,
                ct,
                text,
                text_reported,
                ..
            }) => {
                if ct.text_type.is_some() {
                    text.push_str(chunk);
                } else if !ct.mixed && !*text_reported && !chunk.trim().is_empty() {
                    *text_reported = true;
                    findings.push(Finding::error(format!(
                        "Text content not allowed in element-only content of '{}'",
                        name
                    )));
                }
            }
            Some(Frame::Skip) | None => {}
        }
        findings
    }

    pub(crate) fn end_element(&mut self) -> Vec<Finding> {
        let mut findings = Vec::new();
        match self.stack.pop() {
            Some(Frame::Simple { name, check, text }) => {
                check_text(&name, check, &text, &mut findings);
            }
            Some(Frame::Complex {
                name,
                ct,
                state,
                failed,
                text,
                ..
            }) => {
                if let Some(particle) = ct.content.as_ref().filter(|_| !failed) {
                    if let Some(message) = state.missing(particle) {
                        findings.push(Finding::error(message));
                    }
                }
                if let Some(text_type) = &ct.text_type {
                    if let ResolvedType::Simple(check) = self.schema.resolve_type(text_type) {
                        check_text(&name, check, &text, &mut findings);
                    }
                }
            }
            Some(Frame::Skip) | None => {}
        }
        findings
    }

    fn check_attributes(
        &self,
        ct: &ComplexType,
        element: &str,
        attrs: &Attributes,
        findings: &mut Vec<Finding>,
    ) {
        for attr_use in &ct.attributes {
            match attrs.get_ns(attr_use.namespace.as_deref(), &attr_use.name) {
                None if attr_use.required => findings.push(Finding::error(format!(
                    "Required attribute '{}' missing from element '{}'",
                    attr_use.name, element
                ))),
                None => {}
                Some(value) => {
                    let type_ref = match &attr_use.type_ref {
                        Some(type_ref) => Some(type_ref),
                        None => self
                            .schema
                            .global_attribute(attr_use.namespace.as_deref(), &attr_use.name)
                            .map(|decl| &decl.type_ref),
                    };
                    if let Some(ResolvedType::Simple(check)) =
                        type_ref.map(|t| self.schema.resolve_type(t))
                    {
                        if !check.accepts(value) {
                            findings.push(Finding::error(format!(
                                "Attribute validation failed for '{}.{}': expected type {}, found '{}'",
                                element,
                                attr_use.name,
                                check.type_name(),
                                value
                            )));
                        }
                    }
                }
            }
        }

        if ct.any_attribute {
            return;
        }
        for attr in attrs {
            if attr.name.namespace() == Some(XSI_NAMESPACE) {
                continue;
            }
            let declared = ct
                .attributes
                .iter()
                .any(|u| attr.name.matches(u.namespace.as_deref(), &u.name));
            if !declared {
                findings.push(Finding::error(format!(
                    "Attribute '{}' is not declared for element '{}'",
                    attr.name, element
                )));
            }
        }
    }
}

/// Type of the element a content model term matched.
fn term_type<'s>(
    schema: &'s Schema,
    term: &'s Term,
    findings: &mut Vec<Finding>,
) -> Option<&'s TypeRef> {
    match term {
        Term::Element(decl) => Some(&decl.type_ref),
        Term::Ref { namespace, name } => match schema.global_element(namespace.as_deref(), name) {
            Some(decl) => Some(&decl.type_ref),
            None => {
                findings.push(Finding::error(format!(
                    "Unknown element '{}' not defined in schema",
                    name
                )));
                None
            }
        },
        Term::Any(_) | Term::Group(_) => None,
    }
}

fn unexpected_message(element: &str, parent: &str, expected: &[String]) -> String {
    if expected.is_empty() {
        return format!(
            "Element '{}' is not expected in '{}'; no more elements are allowed",
            element, parent
        );
    }
    let expected: Vec<String> = expected.iter().map(|e| format!("'{}'", e)).collect();
    format!(
        "Element '{}' is not expected in '{}'; expected {}",
        element,
        parent,
        expected.join(", ")
    )
}

fn check_text(name: &str, check: SimpleCheck<'_>, text: &str, findings: &mut Vec<Finding>) {
    if !check.accepts(text) {
        findings.push(Finding::error(format!(
            "Type validation failed for '{}': expected {}, found '{}'",
            name,
            check.type_name(),
            text.trim()
        )));
    }
}
