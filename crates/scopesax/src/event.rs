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

//! Element names and attribute sets carried by reader events.

use std::fmt;

/// A namespace-resolved element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace: Option<String>,
    prefix: Option<String>,
    local_name: String,
}

impl QualifiedName {
    /// Create a name from its parts.
    pub fn new(
        namespace: Option<impl Into<String>>,
        prefix: Option<impl Into<String>>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.map(Into::into),
            prefix: prefix.map(Into::into),
            local_name: local_name.into(),
        }
    }

    /// A name without namespace or prefix.
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local_name: local_name.into(),
        }
    }

    /// Namespace URI, `None` when the name is in no namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Prefix as written in the document.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Local part of the name.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The name as written in the document, `prefix:local` or `local`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Whether this name has the given namespace and local name.
    pub fn matches(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local_name == local_name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// One attribute with its unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: String,
}

/// The attributes of one element, in document order.
///
/// Namespace declarations (`xmlns`, `xmlns:*`) are consumed by the reader
/// and never appear here. The set is owned, so a handler can keep it after
/// the callback that delivered it returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute.
    pub fn push(&mut self, name: QualifiedName, value: impl Into<String>) {
        self.items.push(Attribute {
            name,
            value: value.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.items.iter()
    }

    /// Value of the un-namespaced attribute with this local name.
    pub fn get(&self, local_name: &str) -> Option<&str> {
        self.get_ns(None, local_name)
    }

    /// Value of the attribute with this namespace and local name.
    pub fn get_ns(&self, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.name.matches(namespace, local_name))
            .map(|a| a.value.as_str())
    }

    /// Value of the attribute written as `qname` in the document.
    pub fn get_qualified(&self, qname: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.name.qualified_name() == qname)
            .map(|a| a.value.as_str())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<(QualifiedName, String)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (QualifiedName, String)>>(iter: T) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(name, value)| Attribute { name, value })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DC: &str = "http://purl.org/dc/elements/1.1/";

    #[test]
    fn test_qualified_name_display() {
        let name = QualifiedName::new(Some(DC), Some("dc"), "title");
        assert_eq!(name.to_string(), "dc:title");
        assert_eq!(name.qualified_name(), "dc:title");
        assert_eq!(name.local_name(), "title");
        assert!(name.matches(Some(DC), "title"));
        assert!(!name.matches(None, "title"));

        let plain = QualifiedName::local("item");
        assert_eq!(plain.to_string(), "item");
        assert_eq!(plain.namespace(), None);
    }

    #[test]
    fn test_attribute_lookup() {
        let mut attrs = Attributes::new();
        attrs.push(QualifiedName::local("id"), "x");
        attrs.push(
            QualifiedName::new(Some("http://www.w3.org/XML/1998/namespace"), Some("xml"), "lang"),
            "en",
        );

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("id"), Some("x"));
        assert_eq!(attrs.get("lang"), None);
        assert_eq!(
            attrs.get_ns(Some("http://www.w3.org/XML/1998/namespace"), "lang"),
            Some("en")
        );
        assert_eq!(attrs.get_qualified("xml:lang"), Some("en"));
    }

    #[test]
    fn test_attributes_snapshot_is_independent() {
        let mut attrs: Attributes = vec![(QualifiedName::local("id"), "1".to_string())]
            .into_iter()
            .collect();
        let snapshot = attrs.clone();
        attrs.push(QualifiedName::local("extra"), "2");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(attrs.len(), 2);
        assert_eq!(snapshot.iter().next().map(|a| a.value.as_str()), Some("1"));
    }
}
