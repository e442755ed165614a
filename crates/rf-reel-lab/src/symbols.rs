//! Symbol definitions and the symbol catalog

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Opaque symbol kind identifier
///
/// Stored directly on every symbol instance; identity never comes from a
/// rendered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolKind(pub u32);

impl SymbolKind {
    /// Stable numeric ID
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Unique symbol ID
    pub id: u32,
    /// Symbol name (e.g. "A", "CHERRY")
    pub name: String,
}

impl SymbolDef {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        SymbolKind(self.id)
    }
}

/// Fixed, indexed set of distinct symbol kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolCatalog {
    pub symbols: Vec<SymbolDef>,
}

impl SymbolCatalog {
    /// Create a catalog from definitions
    pub fn new(symbols: Vec<SymbolDef>) -> Self {
        Self { symbols }
    }

    /// The eight-icon set of the classic cabinet
    pub fn classic() -> Self {
        let names = ["A", "B", "F", "G", "H", "J", "L", "N"];
        Self::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| SymbolDef::new(i as u32, *name))
                .collect(),
        )
    }

    /// Uniformly random kind
    ///
    /// The catalog must be non-empty; `validate` enforces this before any
    /// reel is built.
    pub fn random_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolKind {
        let idx = rng.random_range(0..self.symbols.len());
        self.symbols[idx].kind()
    }

    /// Stable comparable key used for run matching
    pub fn identity(&self, kind: SymbolKind) -> u32 {
        kind.id()
    }

    /// Get symbol by kind
    pub fn get(&self, kind: SymbolKind) -> Option<&SymbolDef> {
        self.symbols.iter().find(|s| s.id == kind.id())
    }

    /// Symbol name, if the kind belongs to this catalog
    pub fn name(&self, kind: SymbolKind) -> Option<&str> {
        self.get(kind).map(|s| s.name.as_str())
    }

    /// All kinds in catalog order
    pub fn kinds(&self) -> Vec<SymbolKind> {
        self.symbols.iter().map(SymbolDef::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Reject empty catalogs and duplicate IDs
    pub fn validate(&self) -> SlotResult<()> {
        if self.symbols.is_empty() {
            return Err(SlotError::InvalidConfig("symbol catalog is empty".into()));
        }
        let mut seen = HashSet::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            if !seen.insert(symbol.id) {
                return Err(SlotError::InvalidConfig(format!(
                    "duplicate symbol id {} ({})",
                    symbol.id, symbol.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::classic()
    }
}
