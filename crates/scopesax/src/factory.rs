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

//! Reader factories and the process-wide factory cache.
//!
//! There is one immutable [`ReaderFactory`] per [`ValidationMode`], built
//! once. Compiled schemas are cached as immutable `Arc<Schema>` values keyed
//! by their sources, so any number of threads can build readers at the same
//! time without one reader's schema leaking into another's.
//!
//! # Example
//!
//! ```rust
//! use scopesax::{FactoryCache, ReaderConfig, SchemaSource};
//!
//! let cache = FactoryCache::new(16);
//!
//! let plain = cache.build_reader(&ReaderConfig::default())?;
//! assert!(!plain.is_validating());
//!
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:element name="note" type="xs:string"/>
//! </xs:schema>"#;
//! let config = ReaderConfig::default().with_schema(SchemaSource::from_xsd(xsd));
//! let validating = cache.build_reader(&config)?;
//! assert!(validating.is_validating());
//! assert_eq!(cache.cached_schemas(), 1);
//! # Ok::<(), scopesax::InitError>(())
//! ```

use crate::error::InitError;
use crate::reader::XmlReader;
use crate::schema::{CatalogResolver, LoadedSource, ResourceResolver, Schema, SchemaSource};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

static GLOBAL: Lazy<FactoryCache> = Lazy::new(FactoryCache::default);

/// Whether a reader checks documents against a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    /// Well-formedness checks only
    NonValidating,
    /// Well-formedness plus schema validation
    Validating,
}

/// Configuration for building a reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Schemas to validate against; empty for a non-validating reader
    pub schema_sources: Vec<SchemaSource>,
    /// Buffer size for reading byte streams (default: 64KB)
    pub buffer_size: usize,
    /// Trim whitespace around text and drop whitespace-only text (default: false)
    pub trim_text: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            schema_sources: Vec::new(),
            buffer_size: 65536, // 64KB
            trim_text: false,
        }
    }
}

impl ReaderConfig {
    /// Add a schema source.
    pub fn with_schema(mut self, source: SchemaSource) -> Self {
        self.schema_sources.push(source);
        self
    }

    /// Add several schema sources, compiled together into one schema.
    pub fn with_schema_sources(mut self, sources: impl IntoIterator<Item = SchemaSource>) -> Self {
        self.schema_sources.extend(sources);
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    /// Validating exactly when schema sources are present.
    pub fn validation_mode(&self) -> ValidationMode {
        if self.schema_sources.is_empty() {
            ValidationMode::NonValidating
        } else {
            ValidationMode::Validating
        }
    }
}

/// Builds readers of one validation mode.
#[derive(Debug)]
pub struct ReaderFactory {
    mode: ValidationMode,
}

impl ReaderFactory {
    fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Build a reader. A validating factory requires a schema; a
    /// non-validating one ignores it.
    pub fn new_reader(
        &self,
        schema: Option<Arc<Schema>>,
        config: &ReaderConfig,
    ) -> Result<XmlReader, InitError> {
        match self.mode {
            ValidationMode::Validating => {
                let schema = schema.ok_or(InitError::MissingSchema)?;
                Ok(XmlReader::new(self.mode, Some(schema), config))
            }
            ValidationMode::NonValidating => Ok(XmlReader::new(self.mode, None, config)),
        }
    }
}

/// Shared factories plus a bounded cache of compiled schemas.
pub struct FactoryCache {
    non_validating: ReaderFactory,
    validating: ReaderFactory,
    resolver: Arc<dyn ResourceResolver>,
    /// Keyed by the loaded text of every source
    schemas: RwLock<HashMap<Vec<LoadedSource>, Arc<Schema>>>,
    max_schemas: usize,
}

impl FactoryCache {
    /// The process-wide cache used by [`SaxParser::new`](crate::SaxParser::new).
    pub fn global() -> &'static FactoryCache {
        &GLOBAL
    }

    /// Create a cache keeping at most `max_schemas` compiled schemas.
    pub fn new(max_schemas: usize) -> Self {
        Self::with_resolver(max_schemas, Arc::new(CatalogResolver::new()))
    }

    /// Create a cache resolving schema imports through `resolver`.
    pub fn with_resolver(max_schemas: usize, resolver: Arc<dyn ResourceResolver>) -> Self {
        Self {
            non_validating: ReaderFactory::new(ValidationMode::NonValidating),
            validating: ReaderFactory::new(ValidationMode::Validating),
            resolver,
            schemas: RwLock::new(HashMap::new()),
            max_schemas: max_schemas.max(1),
        }
    }

    pub fn factory(&self, mode: ValidationMode) -> &ReaderFactory {
        match mode {
            ValidationMode::NonValidating => &self.non_validating,
            ValidationMode::Validating => &self.validating,
        }
    }

    /// Build a reader for `config`, compiling or reusing its schema.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if the schema cannot be compiled.
    pub fn build_reader(&self, config: &ReaderConfig) -> Result<XmlReader, InitError> {
        let mode = config.validation_mode();
        let schema = match mode {
            ValidationMode::Validating => Some(self.compile_schema(&config.schema_sources)?),
            ValidationMode::NonValidating => None,
        };
        self.factory(mode).new_reader(schema, config)
    }

    /// Compiled schema for `sources`, from the cache when possible.
    ///
    /// Every source is read on each call and the cache is keyed by what was
    /// read, so a schema file edited on disk is compiled afresh. Documents
    /// pulled in through `xs:include` or `xs:import` are not part of the key.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::MissingSchema`] for an empty source list, or the
    /// loading or compilation error.
    pub fn compile_schema(&self, sources: &[SchemaSource]) -> Result<Arc<Schema>, InitError> {
        if sources.is_empty() {
            return Err(InitError::MissingSchema);
        }
        let loaded = LoadedSource::load_all(sources)?;

        // Try read lock first
        {
            let cache = self.schemas.read();
            if let Some(schema) = cache.get(&loaded) {
                return Ok(Arc::clone(schema));
            }
        }

        let mut cache = self.schemas.write();

        // Double-check in case another thread compiled while we waited
        if let Some(schema) = cache.get(&loaded) {
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(Schema::compile_loaded(&loaded, self.resolver.as_ref())?);

        if cache.len() >= self.max_schemas {
            if let Some(oldest_key) = cache.keys().next().cloned() {
                debug!("Schema cache full ({}), evicting one entry", self.max_schemas);
                cache.remove(&oldest_key);
            }
        }

        cache.insert(loaded, Arc::clone(&schema));
        debug!("Cached compiled schema ({} cached)", cache.len());

        Ok(schema)
    }

    /// Number of cached schemas.
    pub fn cached_schemas(&self) -> usize {
        self.schemas.read().len()
    }

    /// Drop all cached schemas. Readers already built keep theirs.
    pub fn clear(&self) {
        self.schemas.write().clear();
    }
}

impl Default for FactoryCache {
    /// Create default cache with size 100
    fn default() -> Self {
        Self::new(100)
    }
}

impl fmt::Debug for FactoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryCache")
            .field("cached_schemas", &self.cached_schemas())
            .field("max_schemas", &self.max_schemas)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const NOTE_SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="note" type="xs:string"/>
</xs:schema>"#;

    fn source(n: usize) -> SchemaSource {
        SchemaSource::from_xsd(NOTE_SCHEMA).with_system_id(format!("note-{}.xsd", n))
    }

    #[test]
    fn test_config_default() {
        let config = ReaderConfig::default();
        assert_eq!(config.buffer_size, 65536);
        assert!(!config.trim_text);
        assert_eq!(config.validation_mode(), ValidationMode::NonValidating);

        let config = config.with_schema(source(0)).with_trim_text(true);
        assert_eq!(config.validation_mode(), ValidationMode::Validating);
        assert!(config.trim_text);
    }

    #[test]
    fn test_validating_factory_requires_schema() {
        let cache = FactoryCache::new(4);
        let result = cache
            .factory(ValidationMode::Validating)
            .new_reader(None, &ReaderConfig::default());
        assert!(matches!(result, Err(InitError::MissingSchema)));
        assert!(matches!(cache.compile_schema(&[]), Err(InitError::MissingSchema)));
    }

    #[test]
    fn test_schema_cache() {
        let cache = FactoryCache::new(5);
        assert_eq!(cache.cached_schemas(), 0);

        let first = cache.compile_schema(&[source(0)]).unwrap();
        let second = cache.compile_schema(&[source(0)]).unwrap();
        assert_eq!(cache.cached_schemas(), 1);
        assert!(Arc::ptr_eq(&first, &second));

        cache.clear();
        assert_eq!(cache.cached_schemas(), 0);
        // Already built schemas survive clearing.
        assert!(first.declares_element(None, "note"));
    }

    #[test]
    fn test_edited_schema_file_is_recompiled() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("note.xsd");
        std::fs::write(&path, NOTE_SCHEMA).unwrap();

        let cache = FactoryCache::new(4);
        let sources = [SchemaSource::from_file(&path)];
        let first = cache.compile_schema(&sources).unwrap();
        assert!(Arc::ptr_eq(&first, &cache.compile_schema(&sources).unwrap()));

        std::fs::write(
            &path,
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="memo" type="xs:string"/>
</xs:schema>"#,
        )
        .unwrap();

        let second = cache.compile_schema(&sources).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.declares_element(None, "memo"));
        assert!(!second.declares_element(None, "note"));
    }

    #[test]
    fn test_same_text_shares_a_schema() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("note.xsd");
        std::fs::write(&path, NOTE_SCHEMA).unwrap();

        let cache = FactoryCache::new(4);
        let from_file = cache.compile_schema(&[SchemaSource::from_file(&path)]).unwrap();
        let named = SchemaSource::from_xsd(NOTE_SCHEMA).with_system_id(path.display().to_string());
        assert!(Arc::ptr_eq(&from_file, &cache.compile_schema(&[named]).unwrap()));
    }

    #[test]
    fn test_cache_eviction() {
        let cache = FactoryCache::new(2);
        for n in 0..3 {
            cache.compile_schema(&[source(n)]).unwrap();
        }
        assert_eq!(cache.cached_schemas(), 2);
    }

    #[test]
    fn test_failed_compilation_is_not_cached() {
        let cache = FactoryCache::new(2);
        let broken = SchemaSource::from_xsd("<xs:schema");
        assert!(matches!(
            cache.compile_schema(&[broken]),
            Err(InitError::SchemaParse { .. })
        ));
        assert_eq!(cache.cached_schemas(), 0);
    }

    #[test]
    fn test_global_cache_is_shared() {
        assert!(std::ptr::eq(FactoryCache::global(), FactoryCache::global()));
    }

    #[test]
    fn test_concurrent_cache_access() {
        let cache = Arc::new(FactoryCache::new(10));

        let mut handles = vec![];
        for _ in 0..8 {
            let cache_clone = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    let config = ReaderConfig::default().with_schema(source(0));
                    let reader = cache_clone.build_reader(&config).unwrap();
                    assert!(reader.is_validating());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.cached_schemas(), 1);
    }
}
