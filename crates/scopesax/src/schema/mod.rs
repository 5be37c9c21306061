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

//! XSD schema compilation and streaming validation.
//!
//! A [`Schema`] is compiled once from one or more [`SchemaSource`]s and is
//! immutable afterwards, so it can be shared between readers on any thread.
//! External references (`xs:import`, `xs:include`) are satisfied by a
//! [`ResourceResolver`]; the default [`CatalogResolver`] knows the W3C
//! `xml.xsd` document and local files, and never touches the network.
//!
//! # Supported subset
//!
//! - global and local `xs:element` declarations, `ref`, `minOccurs`, `maxOccurs`,
//!   `elementFormDefault`/`attributeFormDefault` and `form`
//! - anonymous and named `xs:complexType`, `mixed` content, `xs:simpleContent`
//! - nested `xs:sequence`, `xs:choice` and `xs:all` groups, checked in order
//! - `xs:any` wildcards (lax: matching subtrees are not checked)
//! - `xs:attribute` (local or `ref`), `use="required"`, `xs:anyAttribute`
//! - named and anonymous `xs:simpleType` restrictions with `xs:enumeration`
//! - every XML Schema 1.0 built-in simple type
//!
//! # Example
//!
//! ```rust
//! use scopesax::schema::{CatalogResolver, Schema, SchemaSource};
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
//! let schema = Schema::compile(&[SchemaSource::from_xsd(xsd)], &CatalogResolver::new())?;
//! assert!(schema.declares_element(None, "person"));
//! # Ok::<(), scopesax::InitError>(())
//! ```

mod compile;
mod content;
mod resolver;
mod types;
mod validator;

pub use resolver::{CatalogResolver, Resource, ResourceResolver, XML_SCHEMA_NAMESPACE};
pub use types::Builtin;

pub(crate) use content::ParticleState;
pub(crate) use validator::{Finding, Validator};

use crate::error::InitError;
use crate::event::QualifiedName;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Namespace of XML Schema itself.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Namespace of `xsi:` instance attributes, which are never validated.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SourceContent {
    Text(String),
    File(PathBuf),
}

/// One schema document to compile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaSource {
    content: SourceContent,
    system_id: Option<String>,
}

impl SchemaSource {
    /// A schema given as XSD text.
    pub fn from_xsd(xsd: impl Into<String>) -> Self {
        Self {
            content: SourceContent::Text(xsd.into()),
            system_id: None,
        }
    }

    /// A schema stored in a local file; relative imports resolve next to it.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            content: SourceContent::File(path.into()),
            system_id: None,
        }
    }

    /// Name the source, for diagnostics and relative import resolution.
    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }

    /// Name used in errors; inline sources are numbered by position.
    pub(crate) fn origin(&self, index: usize) -> String {
        match (&self.system_id, &self.content) {
            (Some(id), _) => id.clone(),
            (None, SourceContent::File(path)) => path.display().to_string(),
            (None, SourceContent::Text(_)) => format!("inline schema {}", index + 1),
        }
    }

    /// Directory relative `schemaLocation`s are resolved against.
    pub(crate) fn base_dir(&self) -> Option<PathBuf> {
        let path = match (&self.content, &self.system_id) {
            (SourceContent::File(path), _) => path.clone(),
            (SourceContent::Text(_), Some(id)) if !id.contains("://") => PathBuf::from(id),
            (SourceContent::Text(_), Some(id)) => PathBuf::from(id.strip_prefix("file://")?),
            (SourceContent::Text(_), None) => return None,
        };
        path.parent().map(Path::to_path_buf)
    }

    pub(crate) fn load(&self, origin: &str) -> Result<String, InitError> {
        match &self.content {
            SourceContent::Text(text) => Ok(text.clone()),
            SourceContent::File(path) => {
                if !path.exists() {
                    return Err(InitError::SchemaNotFound { path: path.clone() });
                }
                fs::read_to_string(path).map_err(|e| InitError::Io {
                    origin: origin.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// A schema source read into memory, ready to compile.
///
/// Two loaded sources are equal when they have the same text, name and
/// base directory, however they were given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct LoadedSource {
    pub origin: String,
    pub text: String,
    pub base: Option<PathBuf>,
}

impl LoadedSource {
    /// Read every source, in order.
    pub(crate) fn load_all(sources: &[SchemaSource]) -> Result<Vec<Self>, InitError> {
        sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let origin = source.origin(index);
                Ok(Self {
                    text: source.load(&origin)?,
                    base: source.base_dir(),
                    origin,
                })
            })
            .collect()
    }
}

/// A compiled, immutable schema.
#[derive(Debug, Default)]
pub struct Schema {
    target_namespace: Option<String>,
    elements: HashMap<String, Vec<ElementDecl>>,
    attributes: HashMap<String, Vec<AttributeDecl>>,
    complex_types: HashMap<String, ComplexType>,
    simple_types: HashMap<String, SimpleTypeDef>,
    documents: Vec<String>,
}

impl Schema {
    /// Compile `sources`, resolving imports through `resolver`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] when a document cannot be read or parsed, uses
    /// unsupported constructs, or references a resource that cannot be
    /// resolved locally.
    pub fn compile(
        sources: &[SchemaSource],
        resolver: &dyn ResourceResolver,
    ) -> Result<Self, InitError> {
        Self::compile_loaded(&LoadedSource::load_all(sources)?, resolver)
    }

    pub(crate) fn compile_loaded(
        sources: &[LoadedSource],
        resolver: &dyn ResourceResolver,
    ) -> Result<Self, InitError> {
        compile::SchemaBuilder::new(resolver).build(sources)
    }

    /// Target namespace of the first schema source.
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Whether a top-level element with this name is declared.
    pub fn declares_element(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.global_element(namespace, local_name).is_some()
    }

    /// Whether a top-level attribute with this name is declared.
    pub fn declares_attribute(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.global_attribute(namespace, local_name).is_some()
    }

    /// Origins of every document compiled into this schema, imports included.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub(crate) fn global_element(&self, namespace: Option<&str>, local_name: &str) -> Option<&ElementDecl> {
        self.elements
            .get(local_name)?
            .iter()
            .find(|d| d.namespace.as_deref() == namespace)
    }

    pub(crate) fn global_attribute(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<&AttributeDecl> {
        self.attributes
            .get(local_name)?
            .iter()
            .find(|d| d.namespace.as_deref() == namespace)
    }

    /// Look up what a type reference denotes.
    pub(crate) fn resolve_type<'s>(&'s self, type_ref: &'s TypeRef) -> ResolvedType<'s> {
        match type_ref {
            TypeRef::Builtin(b) => ResolvedType::Simple(SimpleCheck::Builtin(*b)),
            TypeRef::AnyType => ResolvedType::Any,
            TypeRef::Complex(ct) => ResolvedType::Complex(ct),
            TypeRef::Simple(def) => ResolvedType::Simple(SimpleCheck::Restricted(def)),
            TypeRef::Unknown(name) => ResolvedType::Unknown(name),
            TypeRef::Named(name) => {
                if let Some(ct) = self.complex_types.get(name) {
                    ResolvedType::Complex(ct)
                } else if let Some(def) = self.simple_types.get(name) {
                    ResolvedType::Simple(SimpleCheck::Restricted(def))
                } else {
                    ResolvedType::Unknown(name)
                }
            }
        }
    }
}

/// Element declaration.
#[derive(Debug, Clone)]
pub(crate) struct ElementDecl {
    pub name: String,
    pub namespace: Option<String>,
    pub type_ref: TypeRef,
}

/// What an element or attribute declaration says about its type.
#[derive(Debug, Clone)]
pub(crate) enum TypeRef {
    Builtin(Builtin),
    /// `xs:anyType` or no type at all: content is not checked
    AnyType,
    /// A named type, looked up when validating
    Named(String),
    Complex(Box<ComplexType>),
    Simple(SimpleTypeDef),
    /// Something in the XSD namespace outside the supported subset
    Unknown(String),
}

/// Complex type definition
#[derive(Debug, Clone, Default)]
pub(crate) struct ComplexType {
    /// Content model; `None` for empty or simple content
    pub content: Option<Particle>,
    pub attributes: Vec<AttributeUse>,
    pub any_attribute: bool,
    pub mixed: bool,
    /// Type of the text for `xs:simpleContent`
    pub text_type: Option<TypeRef>,
}

/// A term of a content model with its occurrence bounds.
#[derive(Debug, Clone)]
pub(crate) struct Particle {
    pub term: Term,
    pub min_occurs: usize,
    /// `None` for `unbounded`
    pub max_occurs: Option<usize>,
}

impl Particle {
    /// Whether the particle can be satisfied without any element.
    pub(crate) fn emptiable(&self) -> bool {
        self.min_occurs == 0 || self.term.emptiable()
    }

    /// First element term anywhere in the model with this name.
    pub(crate) fn find_element(&self, name: &QualifiedName) -> Option<&Term> {
        match &self.term {
            Term::Group(group) => group.particles.iter().find_map(|p| p.find_element(name)),
            Term::Any(_) => None,
            term => term.matches(name).then_some(term),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Term {
    /// Local element declaration
    Element(ElementDecl),
    /// Reference to a global element declaration
    Ref {
        namespace: Option<String>,
        name: String,
    },
    /// `xs:any` wildcard
    Any(NamespaceConstraint),
    Group(ModelGroup),
}

impl Term {
    /// Whether a child element is an instance of this term. Groups match
    /// nothing by themselves.
    pub(crate) fn matches(&self, name: &QualifiedName) -> bool {
        match self {
            Term::Element(decl) => name.matches(decl.namespace.as_deref(), &decl.name),
            Term::Ref {
                namespace,
                name: local,
            } => name.matches(namespace.as_deref(), local),
            Term::Any(namespaces) => namespaces.admits(name.namespace()),
            Term::Group(_) => false,
        }
    }

    /// Name used in messages.
    pub(crate) fn label(&self) -> &str {
        match self {
            Term::Element(decl) => &decl.name,
            Term::Ref { name, .. } => name,
            Term::Any(_) => "xs:any",
            Term::Group(group) => match group.compositor {
                Compositor::Sequence => "xs:sequence",
                Compositor::Choice => "xs:choice",
                Compositor::All => "xs:all",
            },
        }
    }

    fn emptiable(&self) -> bool {
        match self {
            Term::Group(group) if group.compositor == Compositor::Choice => {
                group.particles.iter().any(Particle::emptiable)
            }
            Term::Group(group) => group.particles.iter().all(Particle::emptiable),
            _ => false,
        }
    }
}

/// `xs:sequence`, `xs:choice` or `xs:all` with its members.
#[derive(Debug, Clone)]
pub(crate) struct ModelGroup {
    pub compositor: Compositor,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Compositor {
    /// Members in order
    Sequence,
    /// Exactly one member
    Choice,
    /// Every member once, in any order
    All,
}

/// Which namespaces an `xs:any` wildcard admits.
#[derive(Debug, Clone)]
pub(crate) enum NamespaceConstraint {
    Any,
    /// Any namespace but the target namespace, and not unqualified names
    Other(Option<String>),
    /// The listed namespaces; `None` stands for unqualified names
    Allowed(Vec<Option<String>>),
}

impl NamespaceConstraint {
    pub(crate) fn admits(&self, namespace: Option<&str>) -> bool {
        match self {
            NamespaceConstraint::Any => true,
            NamespaceConstraint::Other(target) => {
                namespace.is_some() && namespace != target.as_deref()
            }
            NamespaceConstraint::Allowed(list) => list.iter().any(|ns| ns.as_deref() == namespace),
        }
    }
}

/// Attribute use inside a complex type.
#[derive(Debug, Clone)]
pub(crate) struct AttributeUse {
    pub name: String,
    pub namespace: Option<String>,
    /// `None` for `ref` uses, typed by the referenced global declaration
    pub type_ref: Option<TypeRef>,
    pub required: bool,
}

/// Top-level attribute declaration.
#[derive(Debug, Clone)]
pub(crate) struct AttributeDecl {
    pub name: String,
    pub namespace: Option<String>,
    pub type_ref: TypeRef,
}

/// Simple type restriction of a built-in base.
#[derive(Debug, Clone)]
pub(crate) struct SimpleTypeDef {
    pub name: Option<String>,
    pub base: Builtin,
    pub enumeration: Vec<String>,
}

impl SimpleTypeDef {
    pub(crate) fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        self.base.accepts(value)
            && (self.enumeration.is_empty() || self.enumeration.iter().any(|e| e == value))
    }
}

pub(crate) enum ResolvedType<'s> {
    Simple(SimpleCheck<'s>),
    Complex(&'s ComplexType),
    Any,
    Unknown(&'s str),
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SimpleCheck<'s> {
    Builtin(Builtin),
    Restricted(&'s SimpleTypeDef),
}

impl SimpleCheck<'_> {
    pub(crate) fn accepts(&self, value: &str) -> bool {
        match self {
            SimpleCheck::Builtin(b) => b.accepts(value),
            SimpleCheck::Restricted(def) => def.accepts(value),
        }
    }

    /// Type name as shown in messages, e.g. `xs:integer`.
    pub(crate) fn type_name(&self) -> String {
        match self {
            SimpleCheck::Builtin(b) => format!("xs:{}", b.name()),
            SimpleCheck::Restricted(def) => match &def.name {
                Some(name) => name.clone(),
                None => format!("restricted xs:{}", def.base.name()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_origin() {
        assert_eq!(SchemaSource::from_xsd("<x/>").origin(0), "inline schema 1");
        assert_eq!(
            SchemaSource::from_xsd("<x/>").with_system_id("didl.xsd").origin(3),
            "didl.xsd"
        );
        assert_eq!(
            SchemaSource::from_file("/schemas/didl.xsd").origin(0),
            "/schemas/didl.xsd"
        );
    }

    #[test]
    fn test_source_base_dir() {
        assert_eq!(
            SchemaSource::from_file("/schemas/didl.xsd").base_dir(),
            Some(PathBuf::from("/schemas"))
        );
        assert_eq!(
            SchemaSource::from_xsd("<x/>")
                .with_system_id("file:///opt/schemas/a.xsd")
                .base_dir(),
            Some(PathBuf::from("/opt/schemas"))
        );
        assert_eq!(
            SchemaSource::from_xsd("<x/>")
                .with_system_id("http://example.com/a.xsd")
                .base_dir(),
            None
        );
        assert_eq!(SchemaSource::from_xsd("<x/>").base_dir(), None);
    }

    #[test]
    fn test_missing_schema_file() {
        let source = SchemaSource::from_file("/nonexistent/schema.xsd");
        assert!(matches!(
            source.load("x"),
            Err(InitError::SchemaNotFound { .. })
        ));
    }

    #[test]
    fn test_namespace_constraint() {
        let other = NamespaceConstraint::Other(Some("urn:didl".to_string()));
        assert!(other.admits(Some("urn:vendor")));
        assert!(!other.admits(Some("urn:didl")));
        assert!(!other.admits(None));

        let allowed = NamespaceConstraint::Allowed(vec![None, Some("urn:a".to_string())]);
        assert!(allowed.admits(None));
        assert!(allowed.admits(Some("urn:a")));
        assert!(!allowed.admits(Some("urn:b")));
        assert!(NamespaceConstraint::Any.admits(None));
    }

    #[test]
    fn test_restricted_simple_type() {
        let def = SimpleTypeDef {
            name: Some("spaceType".to_string()),
            base: Builtin::string(),
            enumeration: vec!["default".to_string(), "preserve".to_string()],
        };
        let check = SimpleCheck::Restricted(&def);
        assert!(check.accepts("preserve"));
        assert!(!check.accepts("collapse"));
        assert_eq!(check.type_name(), "spaceType");
        assert_eq!(SimpleCheck::Builtin(Builtin::string()).type_name(), "xs:string");
    }
}
