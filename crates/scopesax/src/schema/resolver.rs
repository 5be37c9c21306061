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

//! Resolution of schema documents referenced by `xs:import` and `xs:include`.

use crate::error::InitError;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Identifier under which schemas import the XML namespace attributes.
pub const XML_SCHEMA_NAMESPACE: &str = "http://www.w3.org/2001/xml.xsd";

const XML_SCHEMA_RESOURCE: &str = include_str!("../../schemas/xml.xsd");

/// A resolved schema document.
#[derive(Debug, Clone)]
pub struct Resource {
    /// The XSD text
    pub text: Cow<'static, str>,
    /// Name used in errors and to detect repeated imports
    pub origin: String,
    /// Directory the resource's own relative references resolve against
    pub base: Option<PathBuf>,
}

/// Supplies the documents a schema references.
pub trait ResourceResolver: Send + Sync {
    /// Resolve a reference by namespace and/or `schemaLocation`.
    ///
    /// `base` is the directory of the referencing document, when known.
    /// Returns `Ok(None)` when the reference is unknown to this resolver.
    fn resolve(
        &self,
        namespace: Option<&str>,
        location: Option<&str>,
        base: Option<&Path>,
    ) -> Result<Option<Resource>, InitError>;
}

/// Resolver backed by a fixed catalog of bundled documents and the local
/// file system. Remote locations are never fetched.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    catalog: HashMap<&'static str, &'static str>,
}

impl Default for CatalogResolver {
    fn default() -> Self {
        let mut catalog = HashMap::new();
        catalog.insert(XML_SCHEMA_NAMESPACE, XML_SCHEMA_RESOURCE);
        Self { catalog }
    }
}

impl CatalogResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled document registered under `identifier`, if any.
    pub fn lookup(&self, identifier: &str) -> Option<&'static str> {
        self.catalog.get(identifier).copied()
    }

    fn resolve_local(location: &str, base: Option<&Path>) -> Result<Option<Resource>, InitError> {
        let path = if let Some(path) = location.strip_prefix("file://") {
            PathBuf::from(path)
        } else if location.contains("://") {
            return Ok(None);
        } else {
            match base {
                Some(base) => base.join(location),
                None => PathBuf::from(location),
            }
        };

        if !path.exists() {
            return Err(InitError::SchemaNotFound { path });
        }
        let origin = path.display().to_string();
        let text = fs::read_to_string(&path).map_err(|e| InitError::Io {
            origin: origin.clone(),
            message: e.to_string(),
        })?;

        Ok(Some(Resource {
            text: Cow::Owned(text),
            origin,
            base: path.parent().map(Path::to_path_buf),
        }))
    }
}

impl ResourceResolver for CatalogResolver {
    fn resolve(
        &self,
        namespace: Option<&str>,
        location: Option<&str>,
        base: Option<&Path>,
    ) -> Result<Option<Resource>, InitError> {
        for identifier in [location, namespace].into_iter().flatten() {
            if let Some(text) = self.lookup(identifier) {
                return Ok(Some(Resource {
                    text: Cow::Borrowed(text),
                    origin: identifier.to_string(),
                    base: None,
                }));
            }
        }

        match location {
            Some(location) => Self::resolve_local(location, base),
            None => Ok(None),
        }
    }
}
