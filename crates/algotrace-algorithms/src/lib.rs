//! Algotrace Built-in Algorithms
//!
//! Instrumented implementations of classic algorithms, each an
//! [`AlgorithmDef`] whose procedure narrates itself through a
//! [`Tracer`](algotrace_engine::Tracer).
//!
//! | Category | Algorithms |
//! |----------|------------|
//! | sorting | bubble sort, insertion sort, quick sort |
//! | searching | linear search, binary search |
//! | arrays | sliding window |
//! | strings / hashing | naive pattern match, Rabin-Karp |
//! | stacks / queues | balanced parentheses, circular queue |
//! | linked lists | reverse, merge two sorted lists, cycle detection |
//! | recursion | Fibonacci, Tower of Hanoi |
//! | backtracking | N-Queens |
//! | dp | longest common subsequence |
//!
//! [`registry()`] returns a process-wide registry holding all of them.

use std::sync::OnceLock;

use algotrace_engine::{AlgorithmDef, Registry};

mod arrays;
mod backtracking;
mod dp;
mod lists;
mod recursion;
mod searching;
mod sorting;
mod stacks;
mod strings;
mod support;

pub use arrays::sliding_window;
pub use backtracking::n_queens;
pub use dp::longest_common_subsequence;
pub use lists::{detect_cycle, merge_sorted_lists, reverse_linked_list};
pub use recursion::{fibonacci, tower_of_hanoi};
pub use searching::{binary_search, linear_search};
pub use sorting::{bubble_sort, insertion_sort, quick_sort};
pub use stacks::{balanced_parentheses, circular_queue};
pub use strings::{naive_pattern_match, rabin_karp};

/// Every built-in algorithm, in catalog order.
pub fn builtins() -> Vec<AlgorithmDef> {
    vec![
        bubble_sort(),
        insertion_sort(),
        quick_sort(),
        linear_search(),
        binary_search(),
        sliding_window(),
        naive_pattern_match(),
        rabin_karp(),
        balanced_parentheses(),
        circular_queue(),
        reverse_linked_list(),
        merge_sorted_lists(),
        detect_cycle(),
        fibonacci(),
        tower_of_hanoi(),
        n_queens(),
        longest_common_subsequence(),
    ]
}

/// A fresh registry with every built-in registered.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    for def in builtins() {
        registry.register(def);
    }
    tracing::debug!(algorithms = registry.len(), "built-in registry ready");
    registry
}

/// Process-wide registry of the built-ins, built on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(default_registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use algotrace_engine::{Algorithm, Category};
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let defs = builtins();
        let ids: HashSet<_> = defs.iter().map(|d| d.descriptor().id).collect();
        assert_eq!(ids.len(), defs.len());
        assert_eq!(registry().len(), defs.len());
    }

    #[test]
    fn categories_are_populated() {
        let registry = registry();
        assert_eq!(registry.list_by_category(Category::Sorting).count(), 3);
        assert_eq!(registry.list_by_category(Category::LinkedLists).count(), 3);
        assert!(registry.get("n-queens").is_some());
    }

    #[test]
    fn pseudocode_is_present() {
        for def in builtins() {
            let d = def.descriptor();
            assert!(!d.pseudocode.is_empty(), "{} has no pseudocode", d.id);
        }
    }

    #[test]
    fn descriptors_serialize() {
        let json = serde_json::to_value(registry().list_all().collect::<Vec<_>>()).unwrap();
        let first = &json[0];
        assert_eq!(first["id"], "bubble-sort");
        assert_eq!(first["category"], "sorting");
        assert!(json.as_array().unwrap().iter().all(|d| d["pseudocode"].is_array()));
    }
}
