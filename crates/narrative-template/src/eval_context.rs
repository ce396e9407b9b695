/*
 * eval_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation context for template rendering.
//!
//! This module provides [`EvalContext`], which is threaded through all evaluation
//! functions to support:
//!
//! 1. **Diagnostics**: Collect errors and warnings with source locations
//! 2. **Includes**: Resolve, cache and depth-limit `{{ include }}` directives
//! 3. **Language keys**: Record keys generated by the `langkey` pipe
//! 4. **Configuration**: Strict mode for treating warnings as errors

use crate::language_keys::{LanguageKey, LanguageKeyGenerator};
use crate::parser::Template;
use crate::resolver::IncludeResolver;
use narrative_error_reporting::{
    DiagnosticKind, DiagnosticMessage, DiagnosticMessageBuilder,
};
use narrative_source_map::{FileId, SourceContext, SourceInfo};
use std::collections::HashMap;
use std::sync::Arc;

/// Default maximum include nesting depth.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 20;

/// Collector for diagnostic messages of one export.
///
/// Besides the diagnostics it owns the [`SourceContext`] with every template
/// source parsed during the export, so that locations of diagnostics from
/// different templates and includes can all be resolved to `name(line,col)`.
/// Diagnostics keep the order in which they were recorded.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<DiagnosticMessage>,
    sources: SourceContext,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic message.
    pub fn add(&mut self, diagnostic: DiagnosticMessage) {
        self.diagnostics.push(diagnostic);
    }

    /// Register a template source and return its id.
    pub fn add_source(&mut self, name: &str, content: &str) -> FileId {
        self.sources.add_file(name, content)
    }

    pub fn sources(&self) -> &SourceContext {
        &self.sources
    }

    /// Add an error message with an optional source location.
    pub fn error_at(&mut self, message: impl Into<String>, location: impl Into<Option<SourceInfo>>) {
        let diagnostic = DiagnosticMessageBuilder::error(message)
            .with_optional_location(location.into())
            .build();
        self.add(diagnostic);
    }

    /// Add a warning message with an optional source location.
    pub fn warn_at(&mut self, message: impl Into<String>, location: impl Into<Option<SourceInfo>>) {
        let diagnostic = DiagnosticMessageBuilder::warning(message)
            .with_optional_location(location.into())
            .build();
        self.add(diagnostic);
    }

    /// Add a catalogued error. The title comes from the error catalog and
    /// `problem` says what went wrong in this instance.
    pub fn error_with_code(
        &mut self,
        code: &str,
        problem: impl Into<String>,
        location: impl Into<Option<SourceInfo>>,
    ) {
        self.add(coded(DiagnosticKind::Error, code, problem.into(), location.into()));
    }

    /// Add a catalogued warning.
    pub fn warn_with_code(
        &mut self,
        code: &str,
        problem: impl Into<String>,
        location: impl Into<Option<SourceInfo>>,
    ) {
        self.add(coded(DiagnosticKind::Warning, code, problem.into(), location.into()));
    }

    /// Check if any errors were collected (warnings don't count).
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    /// Number of diagnostics carrying `code`.
    pub fn count_code(&self, code: &str) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some(code))
            .count()
    }

    /// One-line summaries with resolved spans, in recording order.
    pub fn summaries(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| d.summary(Some(&self.sources)))
            .collect()
    }

    /// Consume the collector and return the diagnostics in recording order.
    pub fn into_diagnostics(self) -> Vec<DiagnosticMessage> {
        self.diagnostics
    }

    /// Consume the collector, keeping the sources for rendering.
    pub fn into_parts(self) -> (Vec<DiagnosticMessage>, SourceContext) {
        (self.diagnostics, self.sources)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

fn coded(
    kind: DiagnosticKind,
    code: &str,
    problem: String,
    location: Option<SourceInfo>,
) -> DiagnosticMessage {
    DiagnosticMessageBuilder::catalogued(kind, code)
        .problem(problem)
        .with_optional_location(location)
        .build()
}

/// Result of loading an include, cached per render by include name.
#[derive(Debug, Clone)]
pub(crate) enum CachedInclude {
    Loaded(Arc<Template>),
    /// The store has no include with this name.
    Missing,
    /// The store failed to load the include.
    Failed,
    /// The include has a syntax error.
    Invalid,
}

/// Context for template evaluation.
///
/// One `EvalContext` lives for one render call. Diagnostics go into a
/// borrowed [`DiagnosticCollector`], which lets several renders of the same
/// export (the main template, condition snippets, the dialog template)
/// report into one collection.
pub struct EvalContext<'a> {
    pub diagnostics: &'a mut DiagnosticCollector,

    /// Source for `{{ include }}` directives.
    pub resolver: &'a dyn IncludeResolver,

    /// Generator used by the `langkey` pipe.
    pub language_key_generator: Option<&'a dyn LanguageKeyGenerator>,

    /// Current include nesting depth (for recursion protection).
    pub include_depth: usize,

    /// Maximum include nesting depth before an error.
    pub max_include_depth: usize,

    /// Strict mode: treat warnings (e.g., unresolved placeholders) as errors.
    pub strict_mode: bool,

    include_cache: HashMap<String, CachedInclude>,

    /// Set once the include depth limit was hit in this render.
    pub(crate) include_overflow: bool,

    language_keys: Vec<LanguageKey>,
}

impl<'a> EvalContext<'a> {
    pub fn new(diagnostics: &'a mut DiagnosticCollector, resolver: &'a dyn IncludeResolver) -> Self {
        Self {
            diagnostics,
            resolver,
            language_key_generator: None,
            include_depth: 0,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            strict_mode: false,
            include_cache: HashMap::new(),
            include_overflow: false,
            language_keys: Vec::new(),
        }
    }

    /// Enable or disable strict mode.
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Set the maximum include nesting depth.
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    pub fn with_language_key_generator(mut self, generator: &'a dyn LanguageKeyGenerator) -> Self {
        self.language_key_generator = Some(generator);
        self
    }

    pub fn error_at(&mut self, message: impl Into<String>, location: &SourceInfo) {
        self.diagnostics.error_at(message, location.clone());
    }

    pub fn warn_at(&mut self, message: impl Into<String>, location: &SourceInfo) {
        self.diagnostics.warn_at(message, location.clone());
    }

    /// Add an error or warning depending on strict mode.
    pub fn warn_or_error_at(&mut self, message: impl Into<String>, location: &SourceInfo) {
        if self.strict_mode {
            self.error_at(message, location);
        } else {
            self.warn_at(message, location);
        }
    }

    pub fn error_with_code(&mut self, code: &str, problem: impl Into<String>, location: &SourceInfo) {
        self.diagnostics
            .error_with_code(code, problem, location.clone());
    }

    pub fn warn_with_code(&mut self, code: &str, problem: impl Into<String>, location: &SourceInfo) {
        self.diagnostics
            .warn_with_code(code, problem, location.clone());
    }

    /// Add a catalogued error or warning depending on strict mode.
    pub fn warn_or_error_with_code(
        &mut self,
        code: &str,
        problem: impl Into<String>,
        location: &SourceInfo,
    ) {
        if self.strict_mode {
            self.error_with_code(code, problem, location);
        } else {
            self.warn_with_code(code, problem, location);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Record a generated language key. The first value recorded for a key wins.
    pub fn record_language_key(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if self.language_keys.iter().any(|k| k.key == key) {
            return;
        }
        self.language_keys.push(LanguageKey {
            key,
            value: value.into(),
        });
    }

    /// Language keys recorded so far, in first-use order.
    pub fn language_keys(&self) -> &[LanguageKey] {
        &self.language_keys
    }

    pub fn into_language_keys(self) -> Vec<LanguageKey> {
        self.language_keys
    }

    pub(crate) fn cached_include(&self, name: &str) -> Option<CachedInclude> {
        self.include_cache.get(name).cloned()
    }

    pub(crate) fn cache_include(&mut self, name: &str, entry: CachedInclude) {
        self.include_cache.insert(name.to_string(), entry);
    }
}
