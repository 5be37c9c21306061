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

//! Translation of XSD documents into the [`Schema`] model.

use super::{
    AttributeDecl, AttributeUse, Builtin, ComplexType, Compositor, ElementDecl, LoadedSource,
    ModelGroup, NamespaceConstraint, Particle, ResourceResolver, Schema, SimpleTypeDef, Term,
    TypeRef, XSD_NAMESPACE,
};
use crate::error::InitError;
use crate::namespace::XML_NAMESPACE;
use roxmltree::{Document as XmlDocument, Node};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Per-document settings while walking one XSD.
struct DocContext<'c> {
    origin: &'c str,
    target_namespace: Option<String>,
    /// `elementFormDefault="qualified"`
    qualified_elements: bool,
    /// `attributeFormDefault="qualified"`
    qualified_attributes: bool,
}

impl DocContext<'_> {
    fn invalid(&self, message: impl Into<String>) -> InitError {
        InitError::invalid_schema(self.origin, message)
    }

    /// Namespace of a local declaration, from its `form` or the document default.
    fn local_namespace(&self, node: Node<'_, '_>, qualified_by_default: bool) -> Option<String> {
        let qualified = match node.attribute("form") {
            Some(form) => form == "qualified",
            None => qualified_by_default,
        };
        if qualified {
            self.target_namespace.clone()
        } else {
            None
        }
    }
}

pub(crate) struct SchemaBuilder<'r> {
    schema: Schema,
    resolver: &'r dyn ResourceResolver,
    loaded: HashSet<String>,
}

impl<'r> SchemaBuilder<'r> {
    pub(crate) fn new(resolver: &'r dyn ResourceResolver) -> Self {
        Self {
            schema: Schema::default(),
            resolver,
            loaded: HashSet::new(),
        }
    }

    pub(crate) fn build(mut self, sources: &[LoadedSource]) -> Result<Schema, InitError> {
        for (index, source) in sources.iter().enumerate() {
            self.add_document(&source.text, &source.origin, source.base.as_deref(), index == 0)?;
        }
        debug!(
            "Compiled schema from {} document(s): {}",
            self.schema.documents.len(),
            self.schema.documents.join(", ")
        );
        Ok(self.schema)
    }

    fn add_document(
        &mut self,
        text: &str,
        origin: &str,
        base: Option<&Path>,
        primary: bool,
    ) -> Result<(), InitError> {
        if !self.loaded.insert(origin.to_string()) {
            return Ok(());
        }

        let doc = XmlDocument::parse(text).map_err(|e| InitError::SchemaParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

        let root = doc.root_element();
        if root.tag_name().name() != "schema" {
            return Err(InitError::invalid_schema(
                origin,
                "Root element must be <xs:schema>",
            ));
        }

        let cx = DocContext {
            origin,
            target_namespace: root.attribute("targetNamespace").map(str::to_owned),
            qualified_elements: root.attribute("elementFormDefault") == Some("qualified"),
            qualified_attributes: root.attribute("attributeFormDefault") == Some("qualified"),
        };
        if primary {
            self.schema.target_namespace = cx.target_namespace.clone();
        }

        for child in root.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "import" | "include" => self.add_reference(child, base)?,
                "element" => {
                    let decl = parse_element_decl(child, &cx, cx.target_namespace.clone())?;
                    self.schema
                        .elements
                        .entry(decl.name.clone())
                        .or_default()
                        .push(decl);
                }
                "attribute" => {
                    let decl = parse_attribute_decl(child, &cx)?;
                    self.schema
                        .attributes
                        .entry(decl.name.clone())
                        .or_default()
                        .push(decl);
                }
                "complexType" => {
                    let name = required_name(child, &cx, "Named complexType")?;
                    let ct = parse_complex_type(child, &cx)?;
                    self.schema.complex_types.insert(name, ct);
                }
                "simpleType" => {
                    let name = required_name(child, &cx, "Named simpleType")?;
                    let def = parse_simple_type(child, Some(name.clone()));
                    self.schema.simple_types.insert(name, def);
                }
                "group" | "attributeGroup" | "redefine" | "override" => {
                    return Err(cx.invalid(format!(
                        "<xs:{}> is not supported",
                        child.tag_name().name()
                    )));
                }
                _ => {}
            }
        }

        self.schema.documents.push(origin.to_string());
        Ok(())
    }

    fn add_reference(&mut self, node: Node<'_, '_>, base: Option<&Path>) -> Result<(), InitError> {
        let namespace = node.attribute("namespace");
        let location = node.attribute("schemaLocation");

        let resource = self
            .resolver
            .resolve(namespace, location, base)?
            .ok_or_else(|| InitError::UnresolvedReference {
                location: location
                    .or(namespace)
                    .unwrap_or("<unspecified>")
                    .to_string(),
            })?;

        debug!(
            "Resolved {} of {} to {}",
            node.tag_name().name(),
            location.or(namespace).unwrap_or("<unspecified>"),
            resource.origin
        );
        self.add_document(&resource.text, &resource.origin, resource.base.as_deref(), false)
    }
}

fn required_name(node: Node<'_, '_>, cx: &DocContext<'_>, what: &str) -> Result<String, InitError> {
    node.attribute("name")
        .map(str::to_owned)
        .ok_or_else(|| cx.invalid(format!("{} must have 'name' attribute", what)))
}

/// Parse `minOccurs`/`maxOccurs`, defaulting both to 1.
fn occurs(node: Node<'_, '_>, cx: &DocContext<'_>) -> Result<(usize, Option<usize>), InitError> {
    let min = match node.attribute("minOccurs") {
        Some(s) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| cx.invalid(format!("Invalid minOccurs '{}'", s)))?,
        None => 1,
    };
    let max = match node.attribute("maxOccurs").map(str::trim) {
        Some("unbounded") => None,
        Some(s) => Some(
            s.parse::<usize>()
                .map_err(|_| cx.invalid(format!("Invalid maxOccurs '{}'", s)))?,
        ),
        None => Some(1),
    };
    if let Some(max) = max {
        if max < min {
            return Err(cx.invalid(format!(
                "maxOccurs {} is smaller than minOccurs {}",
                max, min
            )));
        }
    }
    Ok((min, max))
}

/// Split a QName value and resolve its prefix against the node's scope.
fn resolve_qname<'a>(node: Node<'a, '_>, qname: &'a str) -> (Option<&'a str>, Option<&'a str>, &'a str) {
    let (prefix, local) = match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    };
    let namespace = match prefix {
        Some("xml") => Some(XML_NAMESPACE),
        _ => node.lookup_namespace_uri(prefix),
    };
    (prefix, namespace, local)
}

fn type_ref(node: Node<'_, '_>, qname: &str) -> TypeRef {
    let (_, namespace, local) = resolve_qname(node, qname);
    match namespace {
        Some(XSD_NAMESPACE) if local == "anyType" => TypeRef::AnyType,
        Some(XSD_NAMESPACE) => Builtin::from_local(local)
            .map(TypeRef::Builtin)
            .unwrap_or_else(|| TypeRef::Unknown(qname.to_string())),
        // Unprefixed built-in names in schemas without a default namespace.
        None => Builtin::from_local(local)
            .map(TypeRef::Builtin)
            .unwrap_or_else(|| TypeRef::Named(local.to_string())),
        Some(_) => TypeRef::Named(local.to_string()),
    }
}

fn parse_element_decl(
    node: Node<'_, '_>,
    cx: &DocContext<'_>,
    namespace: Option<String>,
) -> Result<ElementDecl, InitError> {
    let name = required_name(node, cx, "Element")?;

    let mut type_ref_value = node.attribute("type").map(|t| type_ref(node, t));
    if type_ref_value.is_none() {
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "complexType" => {
                    type_ref_value = Some(TypeRef::Complex(Box::new(parse_complex_type(child, cx)?)));
                    break;
                }
                "simpleType" => {
                    type_ref_value = Some(TypeRef::Simple(parse_simple_type(child, None)));
                    break;
                }
                _ => {}
            }
        }
    }

    Ok(ElementDecl {
        name,
        namespace,
        type_ref: type_ref_value.unwrap_or(TypeRef::AnyType),
    })
}

fn parse_complex_type(node: Node<'_, '_>, cx: &DocContext<'_>) -> Result<ComplexType, InitError> {
    let mut ct = ComplexType {
        mixed: node.attribute("mixed") == Some("true"),
        ..ComplexType::default()
    };

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "sequence" | "choice" | "all" => ct.content = Some(parse_model_group(child, cx)?),
            "attribute" => ct.attributes.push(parse_attribute_use(child, cx)?),
            "anyAttribute" => ct.any_attribute = true,
            "simpleContent" => parse_simple_content(child, cx, &mut ct)?,
            "complexContent" | "group" | "attributeGroup" => {
                return Err(cx.invalid(format!(
                    "<xs:{}> is not supported",
                    child.tag_name().name()
                )));
            }
            _ => {}
        }
    }

    Ok(ct)
}

/// Translate `xs:sequence`, `xs:choice` or `xs:all` with everything nested in it.
fn parse_model_group(node: Node<'_, '_>, cx: &DocContext<'_>) -> Result<Particle, InitError> {
    let compositor = match node.tag_name().name() {
        "choice" => Compositor::Choice,
        "all" => Compositor::All,
        _ => Compositor::Sequence,
    };
    let (min_occurs, max_occurs) = occurs(node, cx)?;

    let mut particles = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        let particle = match child.tag_name().name() {
            "element" => parse_element_particle(child, cx)?,
            "any" => {
                let (min_occurs, max_occurs) = occurs(child, cx)?;
                Particle {
                    term: Term::Any(parse_wildcard(child.attribute("namespace"), cx)),
                    min_occurs,
                    max_occurs,
                }
            }
            "sequence" | "choice" | "all" => parse_model_group(child, cx)?,
            "group" => return Err(cx.invalid("<xs:group> is not supported")),
            _ => continue,
        };

        if compositor == Compositor::All {
            let single_element = matches!(particle.term, Term::Element(_) | Term::Ref { .. })
                && particle.max_occurs.map_or(false, |max| max <= 1);
            if !single_element {
                return Err(cx.invalid(
                    "<xs:all> may only contain elements that occur at most once",
                ));
            }
        }
        particles.push(particle);
    }

    Ok(Particle {
        term: Term::Group(ModelGroup {
            compositor,
            particles,
        }),
        min_occurs,
        max_occurs,
    })
}

fn parse_element_particle(node: Node<'_, '_>, cx: &DocContext<'_>) -> Result<Particle, InitError> {
    let (min_occurs, max_occurs) = occurs(node, cx)?;
    let term = match node.attribute("ref") {
        Some(reference) => {
            let (_, namespace, local) = resolve_qname(node, reference);
            Term::Ref {
                namespace: namespace.map(str::to_owned),
                name: local.to_string(),
            }
        }
        None => {
            let namespace = cx.local_namespace(node, cx.qualified_elements);
            Term::Element(parse_element_decl(node, cx, namespace)?)
        }
    };
    Ok(Particle {
        term,
        min_occurs,
        max_occurs,
    })
}

fn parse_wildcard(namespace: Option<&str>, cx: &DocContext<'_>) -> NamespaceConstraint {
    match namespace.map(str::trim).unwrap_or("##any") {
        "##any" => NamespaceConstraint::Any,
        "##other" => NamespaceConstraint::Other(cx.target_namespace.clone()),
        list => NamespaceConstraint::Allowed(
            list.split_whitespace()
                .map(|token| match token {
                    "##local" => None,
                    "##targetNamespace" => cx.target_namespace.clone(),
                    uri => Some(uri.to_string()),
                })
                .collect(),
        ),
    }
}

fn parse_simple_content(
    node: Node<'_, '_>,
    cx: &DocContext<'_>,
    ct: &mut ComplexType,
) -> Result<(), InitError> {
    let derivation = node
        .children()
        .find(|n| n.is_element() && matches!(n.tag_name().name(), "extension" | "restriction"))
        .ok_or_else(|| cx.invalid("simpleContent must contain an extension or restriction"))?;

    ct.text_type = Some(match derivation.attribute("base") {
        Some(base) => type_ref(derivation, base),
        None => TypeRef::Builtin(Builtin::string()),
    });

    for child in derivation.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "attribute" => ct.attributes.push(parse_attribute_use(child, cx)?),
            "anyAttribute" => ct.any_attribute = true,
            _ => {}
        }
    }
    Ok(())
}

fn attribute_type(node: Node<'_, '_>) -> TypeRef {
    if let Some(t) = node.attribute("type") {
        return type_ref(node, t);
    }
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == "simpleType")
        .map(|st| TypeRef::Simple(parse_simple_type(st, None)))
        .unwrap_or(TypeRef::Builtin(Builtin::string()))
}

fn parse_attribute_use(node: Node<'_, '_>, cx: &DocContext<'_>) -> Result<AttributeUse, InitError> {
    let required = node.attribute("use") == Some("required");

    if let Some(reference) = node.attribute("ref") {
        let (_, namespace, local) = resolve_qname(node, reference);
        return Ok(AttributeUse {
            name: local.to_string(),
            namespace: namespace.map(str::to_owned),
            type_ref: None,
            required,
        });
    }

    Ok(AttributeUse {
        name: required_name(node, cx, "Attribute")?,
        namespace: cx.local_namespace(node, cx.qualified_attributes),
        type_ref: Some(attribute_type(node)),
        required,
    })
}

fn parse_attribute_decl(node: Node<'_, '_>, cx: &DocContext<'_>) -> Result<AttributeDecl, InitError> {
    Ok(AttributeDecl {
        name: required_name(node, cx, "Attribute")?,
        namespace: cx.target_namespace.clone(),
        type_ref: attribute_type(node),
    })
}

/// Simple types reduce to a built-in base plus an optional enumeration;
/// lists and unions are treated as strings.
fn parse_simple_type(node: Node<'_, '_>, name: Option<String>) -> SimpleTypeDef {
    let mut def = SimpleTypeDef {
        name,
        base: Builtin::string(),
        enumeration: Vec::new(),
    };

    let restriction = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "restriction");
    if let Some(restriction) = restriction {
        if let Some(TypeRef::Builtin(base)) = restriction.attribute("base").map(|b| type_ref(restriction, b)) {
            def.base = base;
        }
        def.enumeration = restriction
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "enumeration")
            .filter_map(|n| n.attribute("value"))
            .map(str::to_owned)
            .collect();
    }
    def
}
