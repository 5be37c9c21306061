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

//! Malformed input.

/// Documents that are not well-formed, as (name, xml) pairs.
pub fn malformed_samples() -> Vec<(&'static str, &'static str)> {
    let mut samples = vec![
        ("mismatched_end", "<a><b></a></b>"),
        ("unclosed_root", "<a><b/>"),
        ("two_roots", "<a/><b/>"),
        ("text_after_root", "<a/>trailing"),
        ("unbound_prefix", "<x:a/>"),
        ("empty", ""),
    ];
    samples.extend(truncated_tag_samples());
    samples
}

/// Documents whose input ends inside a tag, as (name, xml) pairs.
pub fn truncated_tag_samples() -> Vec<(&'static str, &'static str)> {
    vec![
        ("truncated_end_tag", "<a>x</a"),
        ("truncated_empty_tag", "<a/"),
        ("truncated_root_end_tag", "<root><b/></root"),
        ("truncated_tag_with_attribute", "<a x=\"1\"/"),
        ("truncated_start_tag", "<person"),
    ]
}
