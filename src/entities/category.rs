// 🏷️ Category Registry - the fixed set of labels an expense may carry
//
// Built once at startup and handed to whoever needs it (validator, tracker).
// There is no runtime mutation: a registry is a value, not a global.

use std::collections::HashSet;
use std::sync::Arc;

/// Labels used when no override is configured, in display order
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "Food",
    "Transport",
    "Leisure",
    "Health",
    "Education",
    "Home",
    "Clothing",
    "Technology",
    "Other",
];

// ============================================================================
// CATEGORY REGISTRY
// ============================================================================

/// Ordered, immutable set of category labels
///
/// Cloning is cheap (shared storage), so the registry can be passed by value
/// into the validator and the HTTP state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    labels: Arc<[String]>,
}

impl CategoryRegistry {
    /// Create registry with the default categories
    pub fn with_defaults() -> Self {
        CategoryRegistry {
            labels: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create registry from custom labels
    ///
    /// Labels are trimmed. Blank labels are skipped; duplicates and an empty
    /// result are rejected.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            if !seen.insert(label.to_string()) {
                return Err(format!("Duplicate category: {}", label));
            }
            ordered.push(label.to_string());
        }

        if ordered.is_empty() {
            return Err("Category registry cannot be empty".to_string());
        }

        Ok(CategoryRegistry {
            labels: ordered.into(),
        })
    }

    /// Exact, case-sensitive membership check
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// All labels in registration order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
