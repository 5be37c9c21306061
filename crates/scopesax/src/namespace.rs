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

//! Namespace declaration scopes for the reader.

use crate::event::QualifiedName;

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of the `xmlns` attributes themselves; never declared.
const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// One `xmlns` or `xmlns:prefix` declaration; an empty URI undeclares.
pub(crate) type Declaration = (Option<String>, String);

/// Stack of in-scope namespace declarations, one entry per open element.
#[derive(Debug, Default)]
pub(crate) struct NamespaceScopes {
    scopes: Vec<Vec<Declaration>>,
}

impl NamespaceScopes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Enter an element carrying these declarations.
    ///
    /// Declarations that break the reserved-prefix rules of Namespaces in
    /// XML 1.0 are rejected and no scope is entered.
    pub(crate) fn push_scope(&mut self, declarations: Vec<Declaration>) -> Result<(), String> {
        for (prefix, uri) in &declarations {
            check_declaration(prefix.as_deref(), uri)?;
        }
        self.scopes.push(declarations);
        Ok(())
    }

    /// Leave the innermost element.
    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Resolve an element name; unprefixed names take the default namespace.
    pub(crate) fn resolve_element(&self, qname: &str) -> Result<QualifiedName, String> {
        let (prefix, local) = split_qname(qname)?;
        let namespace = match prefix {
            Some(prefix) => Some(self.lookup_prefix(prefix)?),
            None => self.lookup(None).map(str::to_owned),
        };
        Ok(QualifiedName::new(namespace, prefix, local))
    }

    /// Resolve an attribute name; unprefixed attributes are in no namespace.
    pub(crate) fn resolve_attribute(&self, qname: &str) -> Result<QualifiedName, String> {
        let (prefix, local) = split_qname(qname)?;
        let namespace = match prefix {
            Some(prefix) => Some(self.lookup_prefix(prefix)?),
            None => None,
        };
        Ok(QualifiedName::new(namespace, prefix, local))
    }

    fn lookup_prefix(&self, prefix: &str) -> Result<String, String> {
        if prefix == "xml" {
            return Ok(XML_NAMESPACE.to_string());
        }
        self.lookup(Some(prefix))
            .map(str::to_owned)
            .ok_or_else(|| format!("Namespace prefix '{}' is not declared", prefix))
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(p, _)| p.as_deref() == prefix)
            .and_then(|(_, uri)| if uri.is_empty() { None } else { Some(uri.as_str()) })
    }
}

fn check_declaration(prefix: Option<&str>, uri: &str) -> Result<(), String> {
    match prefix {
        Some("xmlns") => Err("The prefix 'xmlns' must not be declared".to_string()),
        Some("xml") if uri != XML_NAMESPACE => Err(format!(
            "The prefix 'xml' cannot be bound to '{}'",
            uri
        )),
        Some("xml") => Ok(()),
        _ if uri == XML_NAMESPACE || uri == XMLNS_NAMESPACE => Err(format!(
            "Namespace '{}' is reserved and cannot be bound to {}",
            uri,
            prefix.map_or_else(|| "the default namespace".to_string(), |p| format!("prefix '{}'", p))
        )),
        Some(p) if uri.is_empty() => Err(format!("Namespace prefix '{}' cannot be undeclared", p)),
        _ => Ok(()),
    }
}

fn split_qname(qname: &str) -> Result<(Option<&str>, &str), String> {
    match qname.split_once(':') {
        None => Ok((None, qname)),
        Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() && !local.contains(':') => {
            Ok((Some(prefix), local))
        }
        Some(_) => Err(format!("Malformed qualified name '{}'", qname)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(prefix: Option<&str>, uri: &str) -> Declaration {
        (prefix.map(str::to_owned), uri.to_owned())
    }

    #[test]
    fn test_default_namespace_applies_to_elements_only() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope(vec![decl(None, "urn:a")]).unwrap();

        let element = scopes.resolve_element("item").unwrap();
        assert_eq!(element.namespace(), Some("urn:a"));

        let attribute = scopes.resolve_attribute("id").unwrap();
        assert_eq!(attribute.namespace(), None);
    }

    #[test]
    fn test_inner_declaration_shadows_outer() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope(vec![decl(Some("p"), "urn:outer")]).unwrap();
        scopes.push_scope(vec![decl(Some("p"), "urn:inner")]).unwrap();
        assert_eq!(
            scopes.resolve_element("p:x").unwrap().namespace(),
            Some("urn:inner")
        );

        scopes.pop_scope();
        assert_eq!(
            scopes.resolve_element("p:x").unwrap().namespace(),
            Some("urn:outer")
        );
    }

    #[test]
    fn test_empty_default_undeclares() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope(vec![decl(None, "urn:a")]).unwrap();
        scopes.push_scope(vec![decl(None, "")]).unwrap();
        assert_eq!(scopes.resolve_element("x").unwrap().namespace(), None);
    }

    #[test]
    fn test_xml_prefix_is_predeclared() {
        let scopes = NamespaceScopes::new();
        let name = scopes.resolve_attribute("xml:lang").unwrap();
        assert_eq!(name.namespace(), Some(XML_NAMESPACE));
        assert_eq!(name.prefix(), Some("xml"));
    }

    #[test]
    fn test_undeclared_prefix_is_rejected() {
        let scopes = NamespaceScopes::new();
        let err = scopes.resolve_element("dc:title").unwrap_err();
        assert!(err.contains("'dc'"));
    }

    #[test]
    fn test_reserved_prefixes() {
        let mut scopes = NamespaceScopes::new();
        assert!(scopes.push_scope(vec![decl(Some("xml"), XML_NAMESPACE)]).is_ok());
        for (prefix, uri) in [
            (Some("xmlns"), "urn:a"),
            (Some("xml"), "urn:a"),
            (Some("x"), XML_NAMESPACE),
            (None, XML_NAMESPACE),
            (Some("x"), XMLNS_NAMESPACE),
        ] {
            assert!(
                scopes.push_scope(vec![decl(prefix, uri)]).is_err(),
                "{:?} -> {}",
                prefix,
                uri
            );
        }
        // Rejected declarations leave the stack as it was.
        scopes.pop_scope();
        assert!(scopes.scopes.is_empty());
    }

    #[test]
    fn test_prefix_cannot_be_undeclared() {
        let mut scopes = NamespaceScopes::new();
        let err = scopes.push_scope(vec![decl(Some("p"), "")]).unwrap_err();
        assert_eq!(err, "Namespace prefix 'p' cannot be undeclared");
    }

    #[test]
    fn test_malformed_qualified_names() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope(vec![decl(Some("p"), "urn:p")]).unwrap();
        for name in [":a", "p:", "p:a:b"] {
            assert_eq!(
                scopes.resolve_element(name).unwrap_err(),
                format!("Malformed qualified name '{}'", name)
            );
        }
        assert!(scopes.resolve_attribute("p:").is_err());
    }
}
