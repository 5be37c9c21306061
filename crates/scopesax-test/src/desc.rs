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

//! A DIDL-Lite style object model parsed with delegating handlers.
//!
//! [`DidlHandler`] owns the document element and delegates each `item` to an
//! [`ItemHandler`], which in turn delegates each `desc` to a [`DescHandler`].
//! A `desc` holds arbitrary foreign markup: the handler asks its
//! [`DescMeta`] for a fresh metadata fragment and copies every nested
//! element into it through a [`FragmentHandler`].

use scopesax::{
    Attributes, CompletedScope, ParseError, ParseResult, QualifiedName, ScopeContext, ScopeHandler,
    XML_NAMESPACE,
};

/// Namespace of the root element of a metadata fragment.
pub const DESC_WRAPPER_NAMESPACE: &str =
    "urn:fourthline-org:cling:support:content-directory-desc-1-0";

/// Local name of the root element of a metadata fragment.
pub const DESC_WRAPPER: &str = "desc-wrapper";

/// One element of a captured fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentNode {
    pub name: QualifiedName,
    pub attributes: Attributes,
    pub text: String,
    pub children: Vec<FragmentNode>,
}

impl FragmentNode {
    pub fn new(name: QualifiedName, attributes: Attributes) -> Self {
        Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// First descendant (depth-first, this node included) with this local name.
    pub fn find(&self, local_name: &str) -> Option<&FragmentNode> {
        if self.name.local_name() == local_name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(local_name))
    }
}

/// A standalone, namespace-qualified element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub root: FragmentNode,
}

/// Descriptor metadata attached to a DIDL object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescMeta {
    pub id: String,
    pub desc_type: Option<String>,
    pub name_space: Option<String>,
    pub metadata: Option<Fragment>,
}

impl DescMeta {
    /// Descriptor from the attributes of a `desc` element.
    pub fn from_attributes(attributes: &Attributes) -> Self {
        Self {
            id: attributes.get("id").unwrap_or_default().to_string(),
            desc_type: attributes.get("type").map(str::to_owned),
            name_space: attributes.get("nameSpace").map(str::to_owned),
            metadata: None,
        }
    }

    /// A fresh, empty fragment rooted at `desc-wrapper`.
    pub fn create_metadata_document(&self) -> Fragment {
        Fragment {
            root: FragmentNode::new(
                QualifiedName::new(Some(DESC_WRAPPER_NAMESPACE), None::<&str>, DESC_WRAPPER),
                Attributes::new(),
            ),
        }
    }
}

/// Copies one element and its content into a [`FragmentNode`].
#[derive(Debug)]
pub struct FragmentHandler {
    open: Vec<FragmentNode>,
}

impl FragmentHandler {
    /// Start capturing at the element that is opening.
    pub fn new(name: &QualifiedName, attributes: &Attributes) -> Self {
        Self {
            open: vec![FragmentNode::new(name.clone(), attributes.clone())],
        }
    }
}

impl ScopeHandler for FragmentHandler {
    type Instance = FragmentNode;

    fn instance(&self) -> &FragmentNode {
        &self.open[0]
    }

    fn into_instance(mut self) -> FragmentNode {
        self.open.swap_remove(0)
    }

    fn start_element(
        &mut self,
        _cx: &mut ScopeContext<'_>,
        name: &QualifiedName,
        attributes: &Attributes,
    ) -> ParseResult<()> {
        self.open
            .push(FragmentNode::new(name.clone(), attributes.clone()));
        Ok(())
    }

    fn characters(&mut self, _cx: &mut ScopeContext<'_>, text: &str) -> ParseResult<()> {
        if let Some(node) = self.open.last_mut() {
            node.text.push_str(text);
        }
        Ok(())
    }

    fn end_element(&mut self, cx: &mut ScopeContext<'_>, _name: &QualifiedName) -> ParseResult<()> {
        if cx.position().is_boundary() {
            return Ok(());
        }
        let node = self
            .open
            .pop()
            .ok_or_else(|| ParseError::handler("fragment closed more elements than it opened"))?;
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => return Err(ParseError::handler("fragment root closed early")),
        }
        Ok(())
    }
}

/// Handles one `desc` scope.
#[derive(Debug)]
pub struct DescHandler {
    meta: DescMeta,
}

impl DescHandler {
    pub fn new(mut meta: DescMeta) -> Self {
        meta.metadata = Some(meta.create_metadata_document());
        Self { meta }
    }
}

impl ScopeHandler for DescHandler {
    type Instance = DescMeta;

    fn instance(&self) -> &DescMeta {
        &self.meta
    }

    fn into_instance(self) -> DescMeta {
        self.meta
    }

    fn start_element(
        &mut self,
        cx: &mut ScopeContext<'_>,
        name: &QualifiedName,
        attributes: &Attributes,
    ) -> ParseResult<()> {
        if cx.position().depth() == 2 {
            cx.delegate(FragmentHandler::new(name, attributes))?;
        }
        Ok(())
    }

    fn child_completed(&mut self, _cx: &mut ScopeContext<'_>, child: CompletedScope) -> ParseResult<()> {
        let node = child
            .into_instance::<FragmentNode>()
            .ok_or_else(|| ParseError::handler("desc child is not a fragment"))?;
        if let Some(fragment) = self.meta.metadata.as_mut() {
            fragment.root.children.push(node);
        }
        Ok(())
    }
}

/// One DIDL-Lite object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidlObject {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub language: Option<String>,
    pub descriptions: Vec<DescMeta>,
}

/// Handles one `item` scope.
#[derive(Debug)]
pub struct ItemHandler {
    object: DidlObject,
}

impl ItemHandler {
    pub fn new(attributes: &Attributes) -> Self {
        Self {
            object: DidlObject {
                id: attributes.get("id").unwrap_or_default().to_string(),
                parent_id: attributes.get("parentID").map(str::to_owned),
                ..DidlObject::default()
            },
        }
    }
}

impl ScopeHandler for ItemHandler {
    type Instance = DidlObject;

    fn instance(&self) -> &DidlObject {
        &self.object
    }

    fn into_instance(self) -> DidlObject {
        self.object
    }

    fn start_element(
        &mut self,
        cx: &mut ScopeContext<'_>,
        name: &QualifiedName,
        attributes: &Attributes,
    ) -> ParseResult<()> {
        match name.local_name() {
            "desc" => cx.delegate(DescHandler::new(DescMeta::from_attributes(attributes))),
            "title" => {
                self.object.language = attributes.get_ns(Some(XML_NAMESPACE), "lang").map(str::to_owned);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn end_element(&mut self, cx: &mut ScopeContext<'_>, name: &QualifiedName) -> ParseResult<()> {
        if name.local_name() == "title" {
            self.object.title = cx.take_characters();
        }
        Ok(())
    }

    fn child_completed(&mut self, _cx: &mut ScopeContext<'_>, child: CompletedScope) -> ParseResult<()> {
        let desc = child
            .into_instance::<DescMeta>()
            .ok_or_else(|| ParseError::handler("item child is not a desc"))?;
        self.object.descriptions.push(desc);
        Ok(())
    }
}

/// Root handler of a DIDL-Lite document.
#[derive(Debug, Default)]
pub struct DidlHandler {
    objects: Vec<DidlObject>,
}

impl DidlHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScopeHandler for DidlHandler {
    type Instance = Vec<DidlObject>;

    fn instance(&self) -> &Vec<DidlObject> {
        &self.objects
    }

    fn into_instance(self) -> Vec<DidlObject> {
        self.objects
    }

    fn start_element(
        &mut self,
        cx: &mut ScopeContext<'_>,
        name: &QualifiedName,
        attributes: &Attributes,
    ) -> ParseResult<()> {
        if name.local_name() == "item" {
            cx.delegate(ItemHandler::new(attributes))?;
        }
        Ok(())
    }

    fn child_completed(&mut self, _cx: &mut ScopeContext<'_>, child: CompletedScope) -> ParseResult<()> {
        let object = child
            .into_instance::<DidlObject>()
            .ok_or_else(|| ParseError::handler("unexpected child of DIDL-Lite"))?;
        self.objects.push(object);
        Ok(())
    }
}
