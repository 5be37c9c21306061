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

//! Well-formed documents.

/// A DIDL-Lite listing with two items, one carrying a `desc` with foreign
/// markup. Valid against [`schemas::didl_lite`](super::schemas::didl_lite).
pub fn didl_lite() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/">
  <item id="1" parentID="0">
    <title xml:lang="en">Track One</title>
    <desc id="cdudn" nameSpace="urn:example:ext"><ext:info xmlns:ext="urn:example:ext" ext:source="cd"><ext:rating>5</ext:rating><ext:tags><ext:tag>live</ext:tag><ext:tag>remaster</ext:tag></ext:tags></ext:info></desc>
  </item>
  <item id="2" parentID="0">
    <title>Track Two</title>
  </item>
</DIDL-Lite>"#
}

/// Valid against [`schemas::person`](super::schemas::person).
pub fn person_valid() -> &'static str {
    r#"<person id="p1"><name>Alice</name><age>30</age><email>alice@example.com</email><email>a@example.org</email></person>"#
}

/// `age` is not an integer.
pub fn person_invalid_age() -> &'static str {
    r#"<person id="p1"><name>Alice</name><age>thirty</age></person>"#
}

/// The required `name` is missing.
pub fn person_missing_name() -> &'static str {
    r#"<person id="p2"><age>41</age></person>"#
}

/// Text on both sides of an empty child.
pub fn mixed_content() -> &'static str {
    "<a>text1<b/>text2</a>"
}

/// Text on both sides of a child with text of its own.
pub fn nested_mixed_content() -> &'static str {
    "<a>text1<c>inner</c>text2</a>"
}

/// `node` elements nested inside `node` elements.
pub fn recursive_nodes() -> &'static str {
    r#"<tree><node id="1"><node id="1.1"><node id="1.1.1"/></node><node id="1.2"/></node><node id="2"/></tree>"#
}

/// A single empty child with one attribute.
pub fn attribute_snapshot() -> &'static str {
    r#"<root><item id="x"/></root>"#
}

/// Prefixed and default namespaces on the same element names.
pub fn namespaced() -> &'static str {
    r#"<lib:catalog xmlns:lib="urn:example:library" xmlns="urn:example:default"><entry lib:kind="book">One</entry><lib:entry>Two</lib:entry></lib:catalog>"#
}

/// Books with titles, for handlers that collect text.
pub fn library() -> &'static str {
    r#"<library>
  <book isbn="9780441013593"><title>Dune</title><author>Frank Herbert</author></book>
  <book isbn="9780141439587"><title>Emma</title><author>Jane Austen</author></book>
  <book isbn="9780451524935"><title>1984</title><author>George Orwell</author></book>
</library>"#
}

/// A library with `count` books, for benchmarks.
pub fn large_library(count: usize) -> String {
    let mut xml = String::from("<library>");
    for i in 0..count {
        xml.push_str(&format!(
            r#"<book isbn="{:013}"><title>Book {}</title><author>Author {}</author></book>"#,
            i, i, i % 97
        ));
    }
    xml.push_str("</library>");
    xml
}
