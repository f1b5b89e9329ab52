//! Property-based tests for hierarchy construction
//!
//! Listings are generated over a small alphabet so that shared prefixes and
//! repeated paths are common.

use proptest::prelude::*;
use repotree::{build_hierarchy, FlatRecord, NodeType, RecordKind, TreeNode};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Strategy for paths of one to four segments, all of which are directory
/// names except the last, which carries an extension and so never collides
/// with a directory
fn file_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 0..4),
        prop::sample::select(vec!["x.rs", "y.md", "z.txt"]),
    )
        .prop_map(|(dirs, file)| {
            let mut segments: Vec<&str> = dirs;
            segments.push(file);
            segments.join("/")
        })
}

fn listing() -> impl Strategy<Value = Vec<FlatRecord>> {
    prop::collection::vec((file_path(), 0u64..10_000), 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(path, size)| FlatRecord::blob(path, size))
            .collect()
    })
}

/// One blob per path plus a tree marker for every ancestor directory
fn conflict_free(records: &[FlatRecord]) -> Vec<FlatRecord> {
    let mut out: Vec<FlatRecord> = unique_sizes(records)
        .into_iter()
        .map(|(path, size)| FlatRecord::blob(path, size))
        .collect();
    let mut dirs = BTreeSet::new();
    for record in &out {
        let segments: Vec<&str> = record.path.split('/').collect();
        for depth in 1..segments.len() {
            dirs.insert(segments[..depth].join("/"));
        }
    }
    out.extend(dirs.into_iter().map(FlatRecord::tree));
    out
}

/// A conflict-free listing together with a permutation of it
fn permuted_listing() -> impl Strategy<Value = (Vec<FlatRecord>, Vec<FlatRecord>)> {
    listing().prop_flat_map(|records| {
        let records = conflict_free(&records);
        (Just(records.clone()), Just(records).prop_shuffle())
    })
}

/// Blobs and tree markers whose names may be a file in one record and a
/// directory in another
fn mixed_listing() -> impl Strategy<Value = Vec<FlatRecord>> {
    let record = (
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d.md"]), 1..4),
        any::<bool>(),
        0u64..10_000,
    )
        .prop_map(|(segments, is_tree, size)| {
            let path = segments.join("/");
            if is_tree {
                FlatRecord::tree(path)
            } else {
                FlatRecord::blob(path, size)
            }
        });
    prop::collection::vec(record, 0..40)
}

/// Size per path, first occurrence wins
fn unique_sizes(records: &[FlatRecord]) -> BTreeMap<String, u64> {
    let mut sizes = BTreeMap::new();
    for record in records {
        sizes
            .entry(record.path.clone())
            .or_insert(record.declared_size());
    }
    sizes
}

/// Every file in the tree with its full path
fn collect_files(node: &TreeNode, prefix: &str, out: &mut BTreeMap<String, u64>) {
    for child in node.children().unwrap_or_default() {
        let path = join(prefix, &child.name);
        if child.is_file() {
            out.insert(path, child.size());
        } else {
            collect_files(child, &path, out);
        }
    }
}

/// Every node below `node` with its full path and type
fn collect_types(node: &TreeNode, prefix: &str, out: &mut BTreeMap<String, NodeType>) {
    for child in node.children().unwrap_or_default() {
        let path = join(prefix, &child.name);
        out.insert(path.clone(), child.node_type());
        collect_types(child, &path, out);
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Every directory's size equals the sum of its children's sizes
fn sizes_consistent(node: &TreeNode) -> bool {
    match node.children() {
        None => true,
        Some(children) => {
            node.size() == children.iter().map(TreeNode::size).sum::<u64>()
                && children.iter().all(sizes_consistent)
        }
    }
}

/// No directory holds two children with the same name
fn names_unique(node: &TreeNode) -> bool {
    match node.children() {
        None => true,
        Some(children) => {
            let names: HashSet<&str> = children.iter().map(|c| c.name.as_str()).collect();
            names.len() == children.len() && children.iter().all(names_unique)
        }
    }
}

fn sorted_sizes(files: &BTreeMap<String, u64>) -> Vec<u64> {
    let mut sizes: Vec<u64> = files.values().copied().collect();
    sizes.sort_unstable();
    sizes
}

proptest! {
    #[test]
    fn prop_root_size_is_sum_of_unique_files(records in listing()) {
        let root = build_hierarchy(&records);
        let expected: u64 = unique_sizes(&records).values().sum();
        prop_assert_eq!(root.size(), expected);
    }

    #[test]
    fn prop_every_file_appears_once(records in listing()) {
        let root = build_hierarchy(&records);
        let mut files = BTreeMap::new();
        collect_files(&root, "", &mut files);
        prop_assert_eq!(files, unique_sizes(&records));
        prop_assert_eq!(root.file_count(), unique_sizes(&records).len());
    }

    #[test]
    fn prop_directory_sizes_consistent(records in listing()) {
        let root = build_hierarchy(&records);
        prop_assert!(sizes_consistent(&root));
    }

    #[test]
    fn prop_permutation_keeps_sizes_and_leaves((records, shuffled) in permuted_listing()) {
        let forward = build_hierarchy(&records);
        let permuted = build_hierarchy(&shuffled);
        prop_assert_eq!(forward.size(), permuted.size());

        let mut forward_files = BTreeMap::new();
        let mut permuted_files = BTreeMap::new();
        collect_files(&forward, "", &mut forward_files);
        collect_files(&permuted, "", &mut permuted_files);
        prop_assert_eq!(sorted_sizes(&forward_files), sorted_sizes(&permuted_files));
        prop_assert_eq!(forward_files, permuted_files);

        let mut forward_types = BTreeMap::new();
        let mut permuted_types = BTreeMap::new();
        collect_types(&forward, "", &mut forward_types);
        collect_types(&permuted, "", &mut permuted_types);
        prop_assert_eq!(forward_types, permuted_types);
    }

    #[test]
    fn prop_duplicates_not_double_counted(records in listing()) {
        let mut doubled = records.clone();
        doubled.extend(records.iter().cloned());
        prop_assert_eq!(build_hierarchy(&doubled), build_hierarchy(&records));
    }

    #[test]
    fn prop_aggregation_idempotent(records in listing()) {
        let root = build_hierarchy(&records);
        let mut again = root.clone();
        let size = again.aggregate_sizes();
        prop_assert_eq!(size, root.size());
        prop_assert_eq!(again, root);
    }

    #[test]
    fn prop_mixed_kinds_keep_tree_well_formed(records in mixed_listing()) {
        let root = build_hierarchy(&records);
        prop_assert!(names_unique(&root));
        prop_assert!(sizes_consistent(&root));

        // A file node is created by the first blob at its path and keeps that size
        let mut first_blob = BTreeMap::new();
        for record in records.iter().filter(|r| r.kind == RecordKind::Blob) {
            first_blob.entry(record.path.clone()).or_insert(record.declared_size());
        }
        let mut files = BTreeMap::new();
        collect_files(&root, "", &mut files);
        for (path, size) in &files {
            prop_assert_eq!(first_blob.get(path), Some(size));
        }
    }

    #[test]
    fn prop_node_types_never_change((records, cut) in mixed_listing()
        .prop_flat_map(|records| {
            let len = records.len();
            (Just(records), 0..=len)
        }))
    {
        let partial = build_hierarchy(&records[..cut]);
        let full = build_hierarchy(&records);

        let mut partial_types = BTreeMap::new();
        let mut full_types = BTreeMap::new();
        collect_types(&partial, "", &mut partial_types);
        collect_types(&full, "", &mut full_types);
        for (path, node_type) in &partial_types {
            prop_assert_eq!(full_types.get(path), Some(node_type));
        }
    }
}
