//! Query engine - the main entry point for evaluation

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde_json::Value;

use crate::ast::ExpressionNode;
use crate::config::EngineConfig;
use crate::evaluator::{EvaluationResult, TreeInterpreter};
use crate::registry::{FunctionRegistry, create_standard_registry};

/// Snapshot of the tree cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of cached trees
    pub size: usize,
    /// Maximum allowed cache size
    pub max_size: usize,
    /// Whether caching is enabled
    pub enabled: bool,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to decode the tree
    pub misses: u64,
}

impl CacheStats {
    /// Share of lookups served from the cache, as a percentage
    pub fn hit_rate_percentage(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return write!(f, "Tree cache: disabled");
        }
        write!(
            f,
            "Tree cache: {}/{} entries, {} hits, {} misses ({:.1}% hit rate)",
            self.size,
            self.max_size,
            self.hits,
            self.misses,
            self.hit_rate_percentage()
        )
    }
}

/// Evaluates expression trees against documents.
///
/// Wraps a [`TreeInterpreter`] and keeps a concurrent cache of trees decoded
/// from JSON text, so the same serialized tree evaluated against many
/// documents is decoded and validated once. The engine is `Send + Sync`.
pub struct QueryEngine {
    interpreter: TreeInterpreter,
    config: EngineConfig,
    tree_cache: DashMap<String, Arc<ExpressionNode>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    /// Create an engine with the standard function library and default config
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with the standard function library
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_registry(Arc::new(create_standard_registry()), config)
    }

    /// Create an engine dispatching function calls to `functions`
    pub fn with_registry(functions: Arc<FunctionRegistry>, config: EngineConfig) -> Self {
        Self {
            interpreter: TreeInterpreter::with_registry(functions),
            config,
            tree_cache: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The underlying interpreter
    pub fn interpreter(&self) -> &TreeInterpreter {
        &self.interpreter
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a tree against a document
    pub fn evaluate(&self, tree: &ExpressionNode, document: &Value) -> EvaluationResult<Value> {
        self.interpreter.visit(tree, document)
    }

    /// Load a tree from its tagged JSON form and evaluate it
    pub fn evaluate_json_tree(&self, tree: &Value, document: &Value) -> EvaluationResult<Value> {
        let tree = ExpressionNode::from_json(tree)?;
        self.evaluate(&tree, document)
    }

    /// Decode a tree from JSON text (through the cache) and evaluate it
    pub fn evaluate_tree_str(&self, tree_text: &str, document: &Value) -> EvaluationResult<Value> {
        let tree = self.compile(tree_text)?;
        self.evaluate(&tree, document)
    }

    /// Decode and validate a tree from JSON text, using the cache when enabled
    pub fn compile(&self, tree_text: &str) -> EvaluationResult<Arc<ExpressionNode>> {
        if !self.config.cache_enabled {
            return ExpressionNode::from_json_str(tree_text).map(Arc::new);
        }

        if let Some(cached) = self.tree_cache.get(tree_text) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!("tree cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let tree = Arc::new(ExpressionNode::from_json_str(tree_text)?);

        if self.tree_cache.len() >= self.config.max_cache_size {
            log::debug!(
                "tree cache full ({} entries), clearing",
                self.tree_cache.len()
            );
            self.tree_cache.clear();
        }
        if self.config.max_cache_size == 0 {
            return Ok(tree);
        }

        // Concurrent first use may race; the first inserted tree wins.
        let entry = self
            .tree_cache
            .entry(tree_text.to_string())
            .or_insert(tree);
        log::trace!("tree cache miss, {} nodes cached", entry.node_count());
        Ok(Arc::clone(entry.value()))
    }

    /// Drop every cached tree
    pub fn clear_cache(&self) {
        self.tree_cache.clear();
    }

    /// Current cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            size: self.tree_cache.len(),
            max_size: self.config.max_cache_size,
            enabled: self.config.cache_enabled,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
