//! Hierarchy builder: flat repository records into a nested, size-aggregated tree

use crate::error::HierarchyError;
use crate::tree::node::{NodeType, TreeNode, ROOT_NAME};
use crate::tree::path;
use crate::types::{FlatRecord, RecordKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// How to treat a record whose path collides with a node of the other type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Keep the first-created node and drop the conflicting record
    #[default]
    FirstWins,
    /// Fail the build on the first conflict
    Reject,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-wins" => Ok(ConflictPolicy::FirstWins),
            "reject" => Ok(ConflictPolicy::Reject),
            other => Err(format!(
                "Invalid conflict policy: {} (must be 'first-wins' or 'reject')",
                other
            )),
        }
    }
}

/// A record that collided with an existing node
#[derive(Debug, Clone, PartialEq, Eq)]
struct Conflict {
    path: String,
    existing: NodeType,
    requested: NodeType,
}

impl From<Conflict> for HierarchyError {
    fn from(conflict: Conflict) -> Self {
        HierarchyError::TypeConflict {
            path: conflict.path,
            existing: conflict.existing,
            requested: conflict.requested,
        }
    }
}

/// Arena slot used while records are being inserted
struct Slot {
    name: String,
    kind: SlotKind,
}

enum SlotKind {
    File {
        size: u64,
    },
    Directory {
        children: Vec<usize>,
        by_name: HashMap<String, usize>,
    },
}

impl Slot {
    fn node_type(&self) -> NodeType {
        match self.kind {
            SlotKind::File { .. } => NodeType::File,
            SlotKind::Directory { .. } => NodeType::Directory,
        }
    }
}

const ROOT_SLOT: usize = 0;

/// Index arena: directories refer to children by slot index, never to parents
struct Arena {
    slots: Vec<Slot>,
}

impl Arena {
    fn new() -> Self {
        Self {
            slots: vec![Slot {
                name: ROOT_NAME.to_string(),
                kind: SlotKind::Directory {
                    children: Vec::new(),
                    by_name: HashMap::new(),
                },
            }],
        }
    }

    fn child_of(&self, dir: usize, name: &str) -> Option<usize> {
        match &self.slots[dir].kind {
            SlotKind::Directory { by_name, .. } => by_name.get(name).copied(),
            SlotKind::File { .. } => None,
        }
    }

    fn attach(&mut self, dir: usize, slot: Slot) -> usize {
        let id = self.slots.len();
        let name = slot.name.clone();
        self.slots.push(slot);
        if let SlotKind::Directory { children, by_name } = &mut self.slots[dir].kind {
            children.push(id);
            by_name.insert(name, id);
        }
        id
    }

    /// Find-or-create every segment of the record's path
    ///
    /// Returns the conflict if one segment already exists with the other type;
    /// the existing node is left untouched in that case.
    fn insert(&mut self, record: &FlatRecord) -> Option<Conflict> {
        let segments = path::split_segments(&record.path);
        if segments.is_empty() {
            debug!(path = %record.path, "Skipping record with empty path");
            return None;
        }

        let last = segments.len() - 1;
        let mut current = ROOT_SLOT;
        for (depth, segment) in segments.iter().enumerate() {
            let terminal = depth == last;
            let requested = match (terminal, record.kind) {
                (true, RecordKind::Blob) => NodeType::File,
                _ => NodeType::Directory,
            };

            match self.child_of(current, segment) {
                Some(existing) => {
                    let existing_type = self.slots[existing].node_type();
                    if existing_type != requested {
                        return Some(Conflict {
                            path: path::join_segments(&segments[..=depth]),
                            existing: existing_type,
                            requested,
                        });
                    }
                    current = existing;
                }
                None => {
                    let kind = match requested {
                        NodeType::File => SlotKind::File {
                            size: record.declared_size(),
                        },
                        NodeType::Directory => SlotKind::Directory {
                            children: Vec::new(),
                            by_name: HashMap::new(),
                        },
                    };
                    current = self.attach(
                        current,
                        Slot {
                            name: segment.to_string(),
                            kind,
                        },
                    );
                }
            }
        }
        None
    }

    fn materialize(&self, id: usize) -> TreeNode {
        let slot = &self.slots[id];
        match &slot.kind {
            SlotKind::File { size } => TreeNode::file(slot.name.clone(), *size),
            SlotKind::Directory { children, .. } => TreeNode::directory_with_children(
                slot.name.clone(),
                children.iter().map(|&child| self.materialize(child)).collect(),
            ),
        }
    }

    fn into_tree(self) -> TreeNode {
        let mut root = self.materialize(ROOT_SLOT);
        root.aggregate_sizes();
        root
    }
}

/// Insert all records, handing each conflict to `on_conflict`, then aggregate
fn assemble<E>(
    records: &[FlatRecord],
    mut on_conflict: impl FnMut(Conflict) -> Result<(), E>,
) -> Result<TreeNode, E> {
    let mut arena = Arena::new();
    for record in records {
        if let Some(conflict) = arena.insert(record) {
            on_conflict(conflict)?;
        }
    }
    Ok(arena.into_tree())
}

fn warn_conflict(conflict: &Conflict) {
    warn!(
        path = %conflict.path,
        existing = %conflict.existing,
        requested = %conflict.requested,
        "Path type conflict, keeping first node"
    );
}

/// Build the tree with the lenient first-wins policy
///
/// Total over any input: empty input yields an empty root, duplicates are
/// absorbed, and conflicting records are dropped with a warning.
pub fn build_hierarchy(records: &[FlatRecord]) -> TreeNode {
    let built = assemble(records, |conflict| {
        warn_conflict(&conflict);
        Ok::<(), Infallible>(())
    });
    match built {
        Ok(root) => root,
        Err(never) => match never {},
    }
}

/// Hierarchy builder with a configurable conflict policy
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    policy: ConflictPolicy,
}

impl HierarchyBuilder {
    /// Create a builder using the first-wins policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Build the complete tree from flat records
    ///
    /// Records are inserted in order; the size pass runs once after the last
    /// insert. Only `ConflictPolicy::Reject` can fail.
    #[instrument(skip_all, fields(record_count = records.len(), policy = ?self.policy))]
    pub fn build(&self, records: &[FlatRecord]) -> Result<TreeNode, HierarchyError> {
        let start = Instant::now();
        debug!("Starting hierarchy build");

        let mut conflicts = 0usize;
        let root = assemble(records, |conflict| match self.policy {
            ConflictPolicy::FirstWins => {
                conflicts += 1;
                warn_conflict(&conflict);
                Ok(())
            }
            ConflictPolicy::Reject => Err(HierarchyError::from(conflict)),
        })?;

        info!(
            files = root.file_count(),
            directories = root.directory_count(),
            total_size = root.size(),
            conflicts,
            duration_ms = start.elapsed().as_millis(),
            "Hierarchy build completed"
        );
        Ok(root)
    }
}
