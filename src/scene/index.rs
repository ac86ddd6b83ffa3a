use std::collections::HashMap;

use crate::scene::node::{NodeId, SceneNode};

#[derive(Clone, Debug)]
struct Entry {
    id: NodeId,
    name: String,
    depth: usize,
    /// Child-index path from the root.
    path: Vec<usize>,
    /// Pre-order position one past the end of this node's subtree.
    subtree_end: usize,
}

/// Id → node index for one tree, built in a single depth-first pass.
///
/// Name lookups scan the pre-order range of a scope's subtree, so "first match wins" follows
/// depth-first order. Structural edits invalidate paths; rebuild the index after them.
#[derive(Clone, Debug, Default)]
pub struct NodeIndex {
    entries: Vec<Entry>,
    positions: HashMap<NodeId, usize>,
}

impl NodeIndex {
    /// Index every node of `root`.
    pub fn build(root: &SceneNode) -> Self {
        let mut out = Self::default();
        let mut path = Vec::new();
        out.visit(root, 0, &mut path);
        out
    }

    fn visit(&mut self, node: &SceneNode, depth: usize, path: &mut Vec<usize>) {
        let pos = self.entries.len();
        self.entries.push(Entry {
            id: node.id,
            name: node.name.clone(),
            depth,
            path: path.clone(),
            subtree_end: pos + 1,
        });
        self.positions.entry(node.id).or_insert(pos);
        for (i, child) in node.children.iter().enumerate() {
            path.push(i);
            self.visit(child, depth + 1, path);
            path.pop();
        }
        self.entries[pos].subtree_end = self.entries.len();
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    /// First node named `name` strictly inside `scope`'s subtree, in depth-first order.
    pub fn find_named(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        let &pos = self.positions.get(&scope)?;
        let end = self.entries[pos].subtree_end;
        self.entries[pos + 1..end]
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id)
    }

    /// Direct children of `parent` named `name`, in paint order.
    pub fn children_named(&self, parent: NodeId, name: &str) -> Vec<NodeId> {
        let Some(&pos) = self.positions.get(&parent) else {
            return Vec::new();
        };
        let depth = self.entries[pos].depth + 1;
        let end = self.entries[pos].subtree_end;
        self.entries[pos + 1..end]
            .iter()
            .filter(|e| e.depth == depth && e.name == name)
            .map(|e| e.id)
            .collect()
    }

    /// Resolve `id` to a node of the indexed tree.
    pub fn get<'a>(&self, root: &'a SceneNode, id: NodeId) -> Option<&'a SceneNode> {
        let path = &self.entries[*self.positions.get(&id)?].path;
        let mut node = root;
        for &i in path {
            node = node.children.get(i)?;
        }
        (node.id == id).then_some(node)
    }

    /// Resolve `id` to a mutable node of the indexed tree.
    pub fn get_mut<'a>(&self, root: &'a mut SceneNode, id: NodeId) -> Option<&'a mut SceneNode> {
        let path = &self.entries[*self.positions.get(&id)?].path;
        let mut node = root;
        for &i in path {
            node = node.children.get_mut(i)?;
        }
        (node.id == id).then_some(node)
    }

    /// Id of the parent of `id`, if it is not the root.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let path = &self.entries[*self.positions.get(&id)?].path;
        let (_, parent_path) = path.split_last()?;
        self.entries
            .iter()
            .find(|e| e.path.as_slice() == parent_path)
            .map(|e| e.id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/index.rs"]
mod tests;
