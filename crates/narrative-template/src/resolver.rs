/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Include template resolution.
//!
//! This module provides the asynchronous [`IncludeResolver`] trait and
//! implementations for loading include templates from memory or from the
//! filesystem. The evaluator awaits the resolver at each `{{ include }}`
//! site.

use crate::error::{TemplateError, TemplateResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Text emitted at an include site whose template could not be found or loaded.
pub const INCLUDE_NOT_FOUND_SENTINEL: &str = "<<INCLUDE TEMPLATE NOT FOUND>>";

/// Trait for loading include templates.
///
/// Implementations are responsible for finding and loading include template
/// source given the name used in `{{ include "Name" }}`.
#[async_trait]
pub trait IncludeResolver: Send + Sync {
    /// Load an include template by name.
    ///
    /// # Returns
    /// * `Ok(Some(source))` - the include source text
    /// * `Ok(None)` - no include with this name exists
    /// * `Err(_)` - the backing store failed
    async fn load(&self, name: &str) -> TemplateResult<Option<String>>;
}

/// Resolver that returns nothing (for testing without includes).
#[derive(Debug, Clone, Default)]
pub struct NullResolver;

#[async_trait]
impl IncludeResolver for NullResolver {
    async fn load(&self, _name: &str) -> TemplateResult<Option<String>> {
        Ok(None)
    }
}

/// Resolver that loads includes from an in-memory map.
///
/// Useful for testing and for templates bundled into the application.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    includes: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include to the resolver.
    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.includes.insert(name.into(), content.into());
        self
    }

    /// Create a resolver with the given includes.
    pub fn with_includes(
        includes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut resolver = Self::new();
        for (name, content) in includes {
            resolver.add(name, content);
        }
        resolver
    }
}

#[async_trait]
impl IncludeResolver for MemoryResolver {
    async fn load(&self, name: &str) -> TemplateResult<Option<String>> {
        Ok(self.includes.get(name).cloned())
    }
}

/// Resolver that loads includes from `<root>/<name>.<extension>`.
///
/// Names that would escape the root directory (absolute paths, `..`) are
/// rejected with [`TemplateError::IncludeLoad`].
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    root: PathBuf,
    extension: String,
}

impl FileSystemResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "template".to_string(),
        }
    }

    /// Use a file extension other than `template`.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Path an include name maps to.
    pub fn include_path(&self, name: &str) -> TemplateResult<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if name.is_empty() || escapes {
            return Err(TemplateError::IncludeLoad {
                name: name.to_string(),
                message: "include names must be relative paths inside the template directory"
                    .to_string(),
            });
        }
        let mut file_name = name.to_string();
        if !self.extension.is_empty() {
            file_name.push('.');
            file_name.push_str(&self.extension);
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl IncludeResolver for FileSystemResolver {
    async fn load(&self, name: &str) -> TemplateResult<Option<String>> {
        let path = self.include_path(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TemplateError::Io(e)),
        }
    }
}

/// Remove the final newline from include content.
///
/// This prevents extra blank lines when composing templates with includes.
pub fn remove_final_newline(content: &str) -> &str {
    content.strip_suffix('\n').unwrap_or(content)
}
