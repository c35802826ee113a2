//! Filter-method registry: maps a method name to a constructor taking one pattern string.

use anyhow::{Context, Result, bail};
use globset::GlobBuilder;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::{Filter, FunctionFilter};

/// Builds a filter from a pattern. Malformed patterns are rejected here, before any worker starts.
pub type FilterConstructor = fn(pattern: &str) -> Result<Arc<dyn Filter>>;

/// Immutable name -> constructor map, injected into the pipeline.
#[derive(Clone)]
pub struct FilterMethods(BTreeMap<&'static str, FilterConstructor>);

impl Default for FilterMethods {
    fn default() -> Self {
        Self::new()
            .with("glob", glob_filter)
            .with("regex", regex_filter)
            .with("path-contains", path_contains_filter)
            .with("contains", contains_filter)
            .with("suffix", suffix_filter)
            .with("prefix", prefix_filter)
    }
}

impl FilterMethods {
    /// Empty registry.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, name: &'static str, constructor: FilterConstructor) -> Self {
        self.0.insert(name, constructor);
        self
    }

    pub fn get(&self, name: &str) -> Option<FilterConstructor> {
        self.0.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }

    /// Look up `name` and construct it with `pattern`.
    pub fn build(&self, name: &str, pattern: &str) -> Result<Arc<dyn Filter>> {
        let Some(constructor) = self.get(name) else {
            bail!(
                "{} is not a valid filtering method; possible values: {}",
                name,
                self.names().join(", ")
            );
        };
        constructor(pattern).with_context(|| format!("while creating {name} filter"))
    }
}

/// Final path component, or "" when there is none.
pub fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
}

fn function_filter<F>(f: F) -> Arc<dyn Filter>
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Arc::new(FunctionFilter::new(f))
}

/// Shell glob on the base name.
fn glob_filter(pattern: &str) -> Result<Arc<dyn Filter>> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .with_context(|| format!("invalid glob pattern {pattern:?}"))?
        .compile_matcher();
    Ok(function_filter(move |path| matcher.is_match(base_name(path))))
}

/// Unanchored regex search on the full path.
fn regex_filter(pattern: &str) -> Result<Arc<dyn Filter>> {
    let re = Regex::new(pattern).with_context(|| format!("invalid regex {pattern:?}"))?;
    Ok(function_filter(move |path| re.is_match(path)))
}

fn path_contains_filter(pattern: &str) -> Result<Arc<dyn Filter>> {
    let pattern = pattern.to_string();
    Ok(function_filter(move |path| path.contains(pattern.as_str())))
}

fn contains_filter(pattern: &str) -> Result<Arc<dyn Filter>> {
    let pattern = pattern.to_string();
    Ok(function_filter(move |path| {
        base_name(path).contains(pattern.as_str())
    }))
}

fn suffix_filter(pattern: &str) -> Result<Arc<dyn Filter>> {
    let pattern = pattern.to_string();
    Ok(function_filter(move |path| path.ends_with(pattern.as_str())))
}

fn prefix_filter(pattern: &str) -> Result<Arc<dyn Filter>> {
    let pattern = pattern.to_string();
    Ok(function_filter(move |path| {
        base_name(path).starts_with(pattern.as_str())
    }))
}
