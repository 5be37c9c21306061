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

//! Scoped handlers and the chain that hands control between them.
//!
//! A [`ScopeHandler`] populates one instance from the events of one element
//! scope. When it meets a nested element that another handler should deal
//! with, it calls [`ScopeContext::delegate`] from its `start_element`
//! callback; the child becomes the active handler until the element that
//! opened it closes, and is then handed back by value through
//! [`ScopeHandler::child_completed`].
//!
//! The [`HandlerChain`] keeps the handlers as an explicit stack of frames:
//! the top frame is the active handler, the frames below are paused, and a
//! popped frame is retired for good. Each frame owns the handler's character
//! buffer, attribute snapshot and scope depth.
//!
//! # Example
//!
//! ```rust
//! use scopesax::{
//!     Attributes, CompletedScope, ParseResult, QualifiedName, SaxParser, ReaderConfig,
//!     ScopeContext, ScopeHandler, InputSource,
//! };
//!
//! #[derive(Default)]
//! struct Item {
//!     id: String,
//!     title: String,
//! }
//!
//! struct ItemHandler(Item);
//!
//! impl ScopeHandler for ItemHandler {
//!     type Instance = Item;
//!
//!     fn instance(&self) -> &Item {
//!         &self.0
//!     }
//!
//!     fn into_instance(self) -> Item {
//!         self.0
//!     }
//!
//!     fn end_element(&mut self, cx: &mut ScopeContext<'_>, name: &QualifiedName) -> ParseResult<()> {
//!         if name.local_name() == "title" {
//!             self.0.title = cx.take_characters();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Items(Vec<Item>);
//!
//! impl ScopeHandler for Items {
//!     type Instance = Vec<Item>;
//!
//!     fn instance(&self) -> &Vec<Item> {
//!         &self.0
//!     }
//!
//!     fn into_instance(self) -> Vec<Item> {
//!         self.0
//!     }
//!
//!     fn start_element(
//!         &mut self,
//!         cx: &mut ScopeContext<'_>,
//!         name: &QualifiedName,
//!         attributes: &Attributes,
//!     ) -> ParseResult<()> {
//!         if name.local_name() == "item" {
//!             let id = attributes.get("id").unwrap_or_default().to_string();
//!             cx.delegate(ItemHandler(Item { id, ..Item::default() }))?;
//!         }
//!         Ok(())
//!     }
//!
//!     fn child_completed(&mut self, _cx: &mut ScopeContext<'_>, child: CompletedScope) -> ParseResult<()> {
//!         if let Some(item) = child.into_instance::<Item>() {
//!             self.0.push(item);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let xml = r#"<items><item id="1"><title>One</title></item><item id="2"><title>Two</title></item></items>"#;
//! let mut parser = SaxParser::new(ReaderConfig::default())?;
//! let items = parser.parse_with(Items::default(), InputSource::from_str(xml))?.into_instance();
//! assert_eq!(items.len(), 2);
//! assert_eq!(items[1].id, "2");
//! assert_eq!(items[1].title, "Two");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{ParseError, ParseResult};
use crate::event::{Attributes, QualifiedName};
use crate::reader::ContentHandler;
use std::any::{self, Any};
use std::fmt;
use std::mem;
use tracing::trace;

/// A handler responsible for one element scope.
///
/// Every callback returns a `Result`; the first error aborts the parse.
pub trait ScopeHandler: 'static {
    /// The value this handler populates.
    type Instance: 'static;

    fn instance(&self) -> &Self::Instance;

    fn into_instance(self) -> Self::Instance
    where
        Self: Sized;

    /// An element opened within this scope. The character buffer has been
    /// reset and the attribute snapshot taken.
    fn start_element(
        &mut self,
        _cx: &mut ScopeContext<'_>,
        _name: &QualifiedName,
        _attributes: &Attributes,
    ) -> ParseResult<()> {
        Ok(())
    }

    fn characters(&mut self, _cx: &mut ScopeContext<'_>, _text: &str) -> ParseResult<()> {
        Ok(())
    }

    /// An element closed within this scope, the boundary element included.
    fn end_element(&mut self, _cx: &mut ScopeContext<'_>, _name: &QualifiedName) -> ParseResult<()> {
        Ok(())
    }

    /// Whether the closing element ends this handler's scope.
    ///
    /// The default matches the element this handler was delegated for, by
    /// depth, so nested elements of the same name never end the scope early.
    fn is_last_element(&self, _name: &QualifiedName, position: ScopePosition) -> bool {
        position.is_boundary()
    }

    /// A handler delegated from this one has retired.
    fn child_completed(&mut self, _cx: &mut ScopeContext<'_>, _child: CompletedScope) -> ParseResult<()> {
        Ok(())
    }
}

/// Object-safe view of a [`ScopeHandler`], as stored in the chain.
pub(crate) trait ErasedHandler {
    fn dispatch_start(
        &mut self,
        cx: &mut ScopeContext<'_>,
        name: &QualifiedName,
        attributes: &Attributes,
    ) -> ParseResult<()>;
    fn dispatch_characters(&mut self, cx: &mut ScopeContext<'_>, text: &str) -> ParseResult<()>;
    fn dispatch_end(&mut self, cx: &mut ScopeContext<'_>, name: &QualifiedName) -> ParseResult<()>;
    fn dispatch_is_last(&self, name: &QualifiedName, position: ScopePosition) -> bool;
    fn dispatch_child_completed(
        &mut self,
        cx: &mut ScopeContext<'_>,
        child: CompletedScope,
    ) -> ParseResult<()>;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn instance_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn into_instance_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<H: ScopeHandler> ErasedHandler for H {
    fn dispatch_start(
        &mut self,
        cx: &mut ScopeContext<'_>,
        name: &QualifiedName,
        attributes: &Attributes,
    ) -> ParseResult<()> {
        self.start_element(cx, name, attributes)
    }

    fn dispatch_characters(&mut self, cx: &mut ScopeContext<'_>, text: &str) -> ParseResult<()> {
        self.characters(cx, text)
    }

    fn dispatch_end(&mut self, cx: &mut ScopeContext<'_>, name: &QualifiedName) -> ParseResult<()> {
        self.end_element(cx, name)
    }

    fn dispatch_is_last(&self, name: &QualifiedName, position: ScopePosition) -> bool {
        self.is_last_element(name, position)
    }

    fn dispatch_child_completed(
        &mut self,
        cx: &mut ScopeContext<'_>,
        child: CompletedScope,
    ) -> ParseResult<()> {
        self.child_completed(cx, child)
    }

    fn type_name(&self) -> &'static str {
        short_type_name(any::type_name::<H>())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn instance_any(&self) -> &dyn Any {
        self.instance()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn into_instance_any(self: Box<Self>) -> Box<dyn Any> {
        Box::new((*self).into_instance())
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}

/// A retired handler, handed to its parent.
pub struct CompletedScope {
    handler: Box<dyn ErasedHandler>,
}

impl CompletedScope {
    /// Short type name of the retired handler.
    pub fn type_name(&self) -> &'static str {
        self.handler.type_name()
    }

    pub fn is<H: ScopeHandler>(&self) -> bool {
        self.handler.as_any().is::<H>()
    }

    /// The retired handler itself, if it is an `H`.
    pub fn downcast<H: ScopeHandler>(self) -> Option<H> {
        self.handler.into_any().downcast::<H>().ok().map(|h| *h)
    }

    /// Borrow the handler's instance, if it is an `I`.
    pub fn instance<I: 'static>(&self) -> Option<&I> {
        self.handler.instance_any().downcast_ref::<I>()
    }

    /// Consume the handler and take its instance, if it is an `I`.
    pub fn into_instance<I: 'static>(self) -> Option<I> {
        self.handler.into_instance_any().downcast::<I>().ok().map(|i| *i)
    }
}

impl fmt::Debug for CompletedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletedScope")
            .field("handler", &self.type_name())
            .finish()
    }
}

/// Where an element sits relative to the active handler's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopePosition {
    depth: usize,
    document_depth: usize,
}

impl ScopePosition {
    /// Depth within the handler's scope; 1 is the element the handler was
    /// delegated for (or the document element for the root handler).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Depth within the document; 1 is the document element.
    pub fn document_depth(&self) -> usize {
        self.document_depth
    }

    pub fn is_boundary(&self) -> bool {
        self.depth == 1
    }
}

/// Per-frame state kept for a handler by the chain.
#[derive(Debug, Default)]
struct ScopeState {
    characters: String,
    attributes: Option<Attributes>,
    depth: usize,
}

type PendingChild = Option<Box<dyn ErasedHandler>>;

/// The session side of a callback: buffered text, the attribute snapshot,
/// the current position and the delegation hook.
pub struct ScopeContext<'a> {
    state: &'a mut ScopeState,
    pending: Option<&'a mut PendingChild>,
    document_depth: usize,
}

impl<'a> ScopeContext<'a> {
    fn new(state: &'a mut ScopeState, pending: Option<&'a mut PendingChild>, document_depth: usize) -> Self {
        Self {
            state,
            pending,
            document_depth,
        }
    }

    /// Hand the element being opened, and everything inside it, to `child`.
    ///
    /// # Errors
    ///
    /// Fails outside of `start_element`, or when a child was already
    /// delegated for this element.
    pub fn delegate<H: ScopeHandler>(&mut self, child: H) -> ParseResult<()> {
        let slot = self
            .pending
            .as_mut()
            .ok_or_else(|| ParseError::handler("delegate() is only allowed while an element opens"))?;
        if slot.is_some() {
            return Err(ParseError::handler(
                "A child handler was already delegated for this element",
            ));
        }
        **slot = Some(Box::new(child));
        Ok(())
    }

    /// Text received since the last element opened.
    pub fn characters(&self) -> &str {
        &self.state.characters
    }

    /// Take the buffered text, leaving the buffer empty.
    pub fn take_characters(&mut self) -> String {
        mem::take(&mut self.state.characters)
    }

    /// Attributes of the most recently opened element in this scope.
    pub fn attributes(&self) -> Option<&Attributes> {
        self.state.attributes.as_ref()
    }

    pub fn position(&self) -> ScopePosition {
        ScopePosition {
            depth: self.state.depth,
            document_depth: self.document_depth,
        }
    }
}

struct Frame {
    handler: Box<dyn ErasedHandler>,
    state: ScopeState,
}

impl Frame {
    fn new(handler: Box<dyn ErasedHandler>, depth: usize) -> Self {
        Self {
            handler,
            state: ScopeState {
                depth,
                ..ScopeState::default()
            },
        }
    }
}

/// Routes reader events to the active handler and performs handoffs.
pub struct HandlerChain {
    stack: Vec<Frame>,
    completed: Option<Box<dyn ErasedHandler>>,
    document_depth: usize,
}

impl HandlerChain {
    /// A chain whose root handler owns the document element.
    pub fn new<H: ScopeHandler>(root: H) -> Self {
        Self {
            stack: vec![Frame::new(Box::new(root), 0)],
            completed: None,
            document_depth: 0,
        }
    }

    /// Number of active and paused handlers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Type name of the active handler.
    pub fn active_handler(&self) -> Option<&'static str> {
        self.stack.last().map(|f| f.handler.type_name())
    }

    /// The retired root handler, once the document has ended.
    pub fn into_completed(self) -> Option<CompletedScope> {
        self.completed.map(|handler| CompletedScope { handler })
    }

    fn active(&mut self) -> ParseResult<&mut Frame> {
        self.stack.last_mut().ok_or(ParseError::NoActiveHandler)
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack: Vec<_> = self.stack.iter().map(|fr| fr.handler.type_name()).collect();
        f.debug_struct("HandlerChain")
            .field("stack", &stack)
            .field("completed", &self.completed.as_ref().map(|h| h.type_name()))
            .field("document_depth", &self.document_depth)
            .finish()
    }
}

impl ContentHandler for HandlerChain {
    fn start_document(&mut self) -> ParseResult<()> {
        self.active().map(|_| ())
    }

    fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> ParseResult<()> {
        self.document_depth += 1;
        let document_depth = self.document_depth;
        let frame = self.active()?;

        let stashed = mem::take(&mut frame.state.characters);
        frame.state.attributes = Some(attributes.clone());
        frame.state.depth += 1;

        let mut pending: PendingChild = None;
        {
            let mut cx = ScopeContext::new(&mut frame.state, Some(&mut pending), document_depth);
            frame.handler.dispatch_start(&mut cx, name, attributes)?;
        }
        trace!("{} starting: {}", frame.handler.type_name(), name.local_name());

        if let Some(child) = pending {
            // Text before the delegated element stays with the parent.
            frame.state.characters = stashed;
            trace!(
                "{} delegating '{}' to {}",
                frame.handler.type_name(),
                name.local_name(),
                child.type_name()
            );
            self.stack.push(Frame::new(child, 1));
        }
        Ok(())
    }

    fn characters(&mut self, text: &str) -> ParseResult<()> {
        let document_depth = self.document_depth;
        let frame = self.active()?;
        frame.state.characters.push_str(text);
        let mut cx = ScopeContext::new(&mut frame.state, None, document_depth);
        frame.handler.dispatch_characters(&mut cx, text)
    }

    fn end_element(&mut self, name: &QualifiedName) -> ParseResult<()> {
        let document_depth = self.document_depth;
        self.document_depth = self.document_depth.saturating_sub(1);
        let frame = self.active()?;

        let position = ScopePosition {
            depth: frame.state.depth,
            document_depth,
        };

        if !frame.handler.dispatch_is_last(name, position) {
            let mut cx = ScopeContext::new(&mut frame.state, None, document_depth);
            frame.handler.dispatch_end(&mut cx, name)?;
            frame.state.depth = frame.state.depth.saturating_sub(1);
            return Ok(());
        }

        frame.state.attributes = None;
        {
            let mut cx = ScopeContext::new(&mut frame.state, None, document_depth);
            frame.handler.dispatch_end(&mut cx, name)?;
        }

        let Some(retired) = self.stack.pop() else {
            return Err(ParseError::NoActiveHandler);
        };
        trace!(
            "{} last element '{}', switching to parent",
            retired.handler.type_name(),
            name.local_name()
        );

        // Elements still open inside the retired scope now belong to the parent.
        let still_open = retired.state.depth.saturating_sub(1);
        match self.stack.last_mut() {
            Some(parent) => {
                parent.state.depth = (parent.state.depth + still_open).saturating_sub(1);
                let mut cx = ScopeContext::new(&mut parent.state, None, self.document_depth);
                parent.handler.dispatch_child_completed(
                    &mut cx,
                    CompletedScope {
                        handler: retired.handler,
                    },
                )
            }
            None => {
                self.completed = Some(retired.handler);
                Ok(())
            }
        }
    }

    fn end_document(&mut self) -> ParseResult<()> {
        match self.stack.len() {
            0 if self.completed.is_some() => Ok(()),
            0 => Err(ParseError::NoActiveHandler),
            1 => {
                self.completed = self.stack.pop().map(|f| f.handler);
                Ok(())
            }
            n => Err(ParseError::handler(format!(
                "{} handlers still active at end of document (innermost: {})",
                n - 1,
                self.active_handler().unwrap_or("unknown")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_policy::FailFast;
    use crate::factory::{ReaderConfig, ValidationMode};
    use crate::input::InputSource;
    use crate::reader::XmlReader;

    #[derive(Debug, Default, PartialEq)]
    struct Node {
        name: String,
        text: String,
        children: Vec<Node>,
    }

    /// Builds a `Node`, delegating every element named `delegate_on`.
    struct NodeHandler {
        node: Node,
        delegate_on: &'static str,
    }

    impl NodeHandler {
        fn new(name: &str, delegate_on: &'static str) -> Self {
            Self {
                node: Node {
                    name: name.to_string(),
                    ..Node::default()
                },
                delegate_on,
            }
        }
    }

    impl ScopeHandler for NodeHandler {
        type Instance = Node;

        fn instance(&self) -> &Node {
            &self.node
        }

        fn into_instance(self) -> Node {
            self.node
        }

        fn start_element(
            &mut self,
            cx: &mut ScopeContext<'_>,
            name: &QualifiedName,
            _attributes: &Attributes,
        ) -> ParseResult<()> {
            if cx.position().depth() > 1 && name.local_name() == self.delegate_on {
                cx.delegate(NodeHandler::new(name.local_name(), self.delegate_on))?;
            }
            Ok(())
        }

        fn end_element(&mut self, cx: &mut ScopeContext<'_>, _name: &QualifiedName) -> ParseResult<()> {
            if cx.position().is_boundary() {
                self.node.text = cx.take_characters();
            }
            Ok(())
        }

        fn child_completed(&mut self, _cx: &mut ScopeContext<'_>, child: CompletedScope) -> ParseResult<()> {
            let node = child
                .into_instance::<Node>()
                .ok_or_else(|| ParseError::handler("unexpected child"))?;
            self.node.children.push(node);
            Ok(())
        }
    }

    fn run(xml: &str, chain: &mut HandlerChain) -> ParseResult<()> {
        XmlReader::new(ValidationMode::NonValidating, None, &ReaderConfig::default()).parse(
            InputSource::from_str(xml),
            chain,
            &mut FailFast,
        )
    }

    fn parse_tree(xml: &str, delegate_on: &'static str) -> Node {
        let mut chain = HandlerChain::new(NodeHandler::new("root", delegate_on));
        run(xml, &mut chain).unwrap();
        chain.into_completed().unwrap().into_instance::<Node>().unwrap()
    }

    #[test]
    fn test_text_around_delegated_child_concatenates() {
        let root = parse_tree("<a>text1<b/>text2</a>", "b");
        assert_eq!(root.text, "text1text2");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "b");
        assert_eq!(root.children[0].text, "");
    }

    #[test]
    fn test_buffer_resets_only_at_open() {
        // Nothing consumed "inner" when <c> closed, so it is still buffered.
        let root = parse_tree("<a>text1<c>inner</c>text2</a>", "b");
        assert_eq!(root.text, "innertext2");
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_same_name_nesting_uses_depth() {
        let root = parse_tree(
            "<node><node>one<node>two</node></node><node>three</node></node>",
            "node",
        );
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "one");
        assert_eq!(root.children[0].children[0].text, "two");
        assert_eq!(root.children[1].text, "three");
    }

    #[test]
    fn test_delegate_outside_start_element_fails() {
        struct Eager;
        impl ScopeHandler for Eager {
            type Instance = ();
            fn instance(&self) -> &() {
                &()
            }
            fn into_instance(self) {}
            fn characters(&mut self, cx: &mut ScopeContext<'_>, _text: &str) -> ParseResult<()> {
                cx.delegate(Eager)
            }
        }

        let mut chain = HandlerChain::new(Eager);
        let err = run("<a>text</a>", &mut chain).unwrap_err();
        assert!(matches!(err, ParseError::Handler(_)));
    }

    #[test]
    fn test_double_delegate_fails() {
        struct Twice;
        impl ScopeHandler for Twice {
            type Instance = ();
            fn instance(&self) -> &() {
                &()
            }
            fn into_instance(self) {}
            fn start_element(
                &mut self,
                cx: &mut ScopeContext<'_>,
                _name: &QualifiedName,
                _attributes: &Attributes,
            ) -> ParseResult<()> {
                if cx.position().depth() == 2 {
                    cx.delegate(Twice)?;
                    cx.delegate(Twice)?;
                }
                Ok(())
            }
        }

        let mut chain = HandlerChain::new(Twice);
        assert!(run("<a><b/></a>", &mut chain).is_err());
    }

    #[test]
    fn test_handler_that_never_retires() {
        struct Sticky;
        impl ScopeHandler for Sticky {
            type Instance = ();
            fn instance(&self) -> &() {
                &()
            }
            fn into_instance(self) {}
            fn is_last_element(&self, _name: &QualifiedName, _position: ScopePosition) -> bool {
                false
            }
        }

        let root = NodeHandler::new("root", "b");
        let mut chain = HandlerChain::new(root);
        // The root delegates nothing here; make its child sticky by hand.
        chain.stack.push(Frame::new(Box::new(Sticky), 0));
        let err = run("<a/>", &mut chain).unwrap_err();
        assert!(err.to_string().contains("still active"));
    }

    #[test]
    fn test_early_retirement_returns_open_elements_to_parent() {
        struct UntilStop;
        impl ScopeHandler for UntilStop {
            type Instance = ();
            fn instance(&self) -> &() {
                &()
            }
            fn into_instance(self) {}
            fn is_last_element(&self, name: &QualifiedName, position: ScopePosition) -> bool {
                position.is_boundary() || name.local_name() == "stop"
            }
        }

        struct Root {
            closed: Vec<String>,
        }
        impl ScopeHandler for Root {
            type Instance = Vec<String>;
            fn instance(&self) -> &Vec<String> {
                &self.closed
            }
            fn into_instance(self) -> Vec<String> {
                self.closed
            }
            fn start_element(
                &mut self,
                cx: &mut ScopeContext<'_>,
                name: &QualifiedName,
                _attributes: &Attributes,
            ) -> ParseResult<()> {
                if name.local_name() == "b" {
                    cx.delegate(UntilStop)?;
                }
                Ok(())
            }
            fn end_element(&mut self, cx: &mut ScopeContext<'_>, name: &QualifiedName) -> ParseResult<()> {
                self.closed.push(format!("{}@{}", name.local_name(), cx.position().depth()));
                Ok(())
            }
        }

        let mut chain = HandlerChain::new(Root { closed: Vec::new() });
        run("<a><b><stop/></b></a>", &mut chain).unwrap();
        let closed = chain
            .into_completed()
            .unwrap()
            .into_instance::<Vec<String>>()
            .unwrap();
        assert_eq!(closed, vec!["b@2", "a@1"]);
    }

    #[test]
    fn test_completed_scope_downcast() {
        let mut chain = HandlerChain::new(NodeHandler::new("root", "b"));
        run("<a/>", &mut chain).unwrap();
        let completed = chain.into_completed().unwrap();
        assert_eq!(completed.type_name(), "NodeHandler");
        assert!(completed.is::<NodeHandler>());
        assert_eq!(completed.instance::<Node>().map(|n| n.name.as_str()), Some("root"));
        assert!(completed.downcast::<NodeHandler>().is_some());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Handler"), "Handler");
        assert_eq!(short_type_name("Handler"), "Handler");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper<b::Inner>");
    }
}
