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

//! Input sources for a parse.
//!
//! An [`InputSource`] is either a byte stream, optionally with a declared
//! character encoding, or an already decoded character stream. Both may
//! carry a system identifier naming where the document came from.
//!
//! ```rust
//! use scopesax::InputSource;
//! use std::io::Cursor;
//!
//! let from_text = InputSource::from_str("<root/>");
//! let from_bytes = InputSource::from_reader(Cursor::new(b"<root/>".to_vec()))
//!     .with_encoding("UTF-8")
//!     .with_system_id("memory:root.xml");
//! assert_eq!(from_bytes.system_id(), Some("memory:root.xml"));
//! # let _ = from_text;
//! ```

use crate::error::{ParseError, ParseResult};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

enum Source<'a> {
    Bytes {
        reader: Box<dyn Read + 'a>,
        encoding: Option<String>,
    },
    Text(&'a str),
    OwnedText(String),
}

/// Where the parser reads a document from.
pub struct InputSource<'a> {
    source: Source<'a>,
    system_id: Option<String>,
}

impl<'a> InputSource<'a> {
    /// A byte stream; the encoding is taken from a byte order mark or the
    /// XML declaration, and is UTF-8 otherwise.
    pub fn from_reader(reader: impl Read + 'a) -> Self {
        Self {
            source: Source::Bytes {
                reader: Box::new(reader),
                encoding: None,
            },
            system_id: None,
        }
    }

    /// A byte slice.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::from_reader(bytes)
    }

    /// A character stream borrowed from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Self {
        Self {
            source: Source::Text(text),
            system_id: None,
        }
    }

    /// A character stream owning its text.
    pub fn from_string(text: String) -> Self {
        Self {
            source: Source::OwnedText(text),
            system_id: None,
        }
    }

    /// A file; its path becomes the system identifier.
    pub fn from_file(path: impl AsRef<Path>) -> ParseResult<InputSource<'static>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(InputSource::from_reader(file).with_system_id(path.display().to_string()))
    }

    /// Declare the character encoding of a byte stream. It takes precedence
    /// over the XML declaration; a byte order mark still wins.
    ///
    /// Has no effect on character streams, which are already decoded.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        if let Source::Bytes { encoding: slot, .. } = &mut self.source {
            *slot = Some(encoding.into());
        }
        self
    }

    /// Set the system identifier used in diagnostics and for relative references.
    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }

    /// The explicitly declared encoding of a byte stream.
    pub fn encoding(&self) -> Option<&str> {
        match &self.source {
            Source::Bytes { encoding, .. } => encoding.as_deref(),
            _ => None,
        }
    }

    /// Whether the source is already decoded text.
    pub fn is_character_stream(&self) -> bool {
        !matches!(self.source, Source::Bytes { .. })
    }

    /// Prepare the source for the tokenizer.
    ///
    /// Character streams and byte streams with an explicit or UTF-16
    /// encoding are decoded up front. Any other byte stream is handed over
    /// as is, and the tokenizer picks the encoding from a byte order mark or
    /// the XML declaration.
    pub(crate) fn open(self, buffer_size: usize) -> ParseResult<Opened<'a>> {
        match self.source {
            Source::Text(text) => Ok(Opened::Text(Cow::Borrowed(text))),
            Source::OwnedText(text) => Ok(Opened::Text(Cow::Owned(text))),
            Source::Bytes {
                reader,
                encoding: Some(label),
            } => {
                let encoding = lookup_encoding(&label)?;
                let bytes = read_all(reader)?;
                decode(&bytes, encoding).map(|text| Opened::Text(Cow::Owned(text)))
            }
            Source::Bytes {
                reader,
                encoding: None,
            } => {
                let mut reader = BufReader::with_capacity(buffer_size, reader);
                match sniff_utf16(reader.fill_buf()?) {
                    Some(encoding) => {
                        let bytes = read_all(reader)?;
                        decode(&bytes, encoding).map(|text| Opened::Text(Cow::Owned(text)))
                    }
                    None => Ok(Opened::Bytes(Box::new(reader))),
                }
            }
        }
    }
}

/// A source ready for tokenizing.
pub(crate) enum Opened<'a> {
    /// Decoded text; an encoding in its XML declaration is not consulted
    Text(Cow<'a, str>),
    /// Raw bytes in an ASCII-compatible encoding
    Bytes(Box<dyn BufRead + 'a>),
}

/// The decoder for an encoding label such as `ISO-8859-1` or `Shift_JIS`.
pub(crate) fn lookup_encoding(label: &str) -> ParseResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ParseError::UnsupportedEncoding(label.to_string()))
}

/// UTF-16 from a byte order mark or from `<?` encoded in 16 bits.
fn sniff_utf16(head: &[u8]) -> Option<&'static Encoding> {
    match head {
        [0xFF, 0xFE, ..] | [b'<', 0x00, b'?', 0x00, ..] => Some(UTF_16LE),
        [0xFE, 0xFF, ..] | [0x00, b'<', 0x00, b'?', ..] => Some(UTF_16BE),
        _ => None,
    }
}

fn read_all(mut reader: impl Read) -> ParseResult<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Decode `bytes`; a byte order mark overrides `encoding`.
fn decode(bytes: &[u8], encoding: &'static Encoding) -> ParseResult<String> {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((encoding, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_length..])
        .map(Cow::into_owned)
        .ok_or_else(|| ParseError::Encoding {
            position: 0,
            message: format!("input is not valid {}", encoding.name()),
        })
}

impl fmt::Debug for InputSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.source {
            Source::Bytes { .. } => "bytes",
            Source::Text(_) | Source::OwnedText(_) => "characters",
        };
        f.debug_struct("InputSource")
            .field("kind", &kind)
            .field("encoding", &self.encoding())
            .field("system_id", &self.system_id)
            .finish()
    }
}
