//! Partial-tree arena backing the streaming walk.
//!
//! The walker materializes only the slice of the document it is currently
//! inside: the open-element chain plus the children of the page being read.
//! Nodes live in a slab with a free list, so reclaiming a finished page
//! returns its slots for reuse and retained memory tracks the live count,
//! not the total number of elements ever parsed.

use std::mem;

/// Handle into the arena. Valid only until the node is reclaimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

#[derive(Debug)]
struct Node {
    name: String,
    in_ns: bool,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
    live: usize,
    peak_live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and append it to `parent`'s child list.
    pub fn alloc(&mut self, name: &str, in_ns: bool, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            name: name.to_string(),
            in_ns,
            text: String::new(),
            parent,
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId((self.slots.len() - 1) as u32)
            }
        };
        if let Some(p) = parent {
            self.node_mut(p).children.push(id);
        }
        self.live += 1;
        self.peak_live = self.peak_live.max(self.live);
        id
    }

    pub fn append_text(&mut self, id: NodeId, text: &str) {
        self.node_mut(id).text.push_str(text);
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    pub fn in_ns(&self, id: NodeId) -> bool {
        self.node(id).in_ns
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Reclaim a finished record: free `id` with its whole subtree, then walk
    /// the ancestor chain and free every ancestor's earlier children along
    /// with the text accumulated on the ancestors themselves.
    ///
    /// The ancestors survive as nodes (they are still open, parsing must
    /// continue under them), but their text came before `id` in document
    /// order and can never be read by a later record, so it is dropped too —
    /// on pretty-printed dumps the inter-record whitespace landing on the
    /// root would otherwise grow with every record.
    pub fn reclaim(&mut self, id: NodeId) {
        let parent = self.node(id).parent;
        self.detach(id);
        self.free_subtree(id);

        let mut keep: Option<NodeId> = None;
        let mut cur = parent;
        while let Some(p) = cur {
            let children = mem::take(&mut self.node_mut(p).children);
            let mut kept = Vec::new();
            for c in children {
                if Some(c) == keep {
                    kept.push(c);
                } else {
                    self.free_subtree(c);
                }
            }
            let node = self.node_mut(p);
            node.children = kept;
            node.text = String::new();
            keep = Some(p);
            cur = self.node(p).parent;
        }
    }

    /// Total bytes of text held by live nodes. Together with
    /// [`live_nodes`](Self::live_nodes) this is what "retained memory" means
    /// for the walk: both must stay bounded regardless of how many records
    /// have been consumed.
    pub fn retained_text_bytes(&self) -> usize {
        self.slots.iter().flatten().map(|n| n.text.len()).sum()
    }

    /// Number of currently live nodes.
    pub fn live_nodes(&self) -> usize {
        self.live
    }

    /// High-water mark of live nodes over the arena's lifetime.
    pub fn peak_live_nodes(&self) -> usize {
        self.peak_live
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(p) = self.node(id).parent {
            let children = &mut self.node_mut(p).children;
            if let Some(pos) = children.iter().position(|&c| c == id) {
                children.remove(pos);
            }
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.slots[n.0 as usize].take().expect("node already freed");
            stack.extend(node.children);
            self.free.push(n.0);
            self.live -= 1;
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        self.slots[id.0 as usize].as_ref().expect("node already freed")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0 as usize].as_mut().expect("node already freed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_links_children_in_order() {
        let mut arena = NodeArena::new();
        let root = arena.alloc("mediawiki", true, None);
        let a = arena.alloc("siteinfo", true, Some(root));
        let b = arena.alloc("page", true, Some(root));
        assert_eq!(arena.children(root), &[a, b]);
        assert_eq!(arena.parent(b), Some(root));
        assert_eq!(arena.live_nodes(), 3);
    }

    #[test]
    fn append_text_accumulates() {
        let mut arena = NodeArena::new();
        let root = arena.alloc("title", true, None);
        arena.append_text(root, "сло");
        arena.append_text(root, "во");
        assert_eq!(arena.text(root), "слово");
    }

    #[test]
    fn reclaim_frees_subtree_and_earlier_siblings() {
        let mut arena = NodeArena::new();
        let root = arena.alloc("mediawiki", true, None);
        let siteinfo = arena.alloc("siteinfo", true, Some(root));
        arena.alloc("sitename", true, Some(siteinfo));
        let page = arena.alloc("page", true, Some(root));
        arena.alloc("title", true, Some(page));
        arena.alloc("ns", true, Some(page));
        assert_eq!(arena.live_nodes(), 6);

        arena.reclaim(page);

        // Only the root (still-open ancestor) survives.
        assert_eq!(arena.live_nodes(), 1);
        assert!(arena.children(root).is_empty());
        assert_eq!(arena.name(root), "mediawiki");
    }

    #[test]
    fn reclaim_preserves_open_ancestor_chain() {
        let mut arena = NodeArena::new();
        let root = arena.alloc("mediawiki", true, None);
        let old_page = arena.alloc("page", true, Some(root));
        arena.alloc("title", true, Some(old_page));
        arena.reclaim(old_page);

        // A deeper close reclaims up through still-open ancestors.
        let page = arena.alloc("page", true, Some(root));
        let revision = arena.alloc("revision", true, Some(page));
        let text = arena.alloc("text", true, Some(revision));
        arena.reclaim(text);
        assert_eq!(arena.live_nodes(), 3);
        assert_eq!(arena.children(root), &[page]);
        assert_eq!(arena.children(page), &[revision]);
        assert!(arena.children(revision).is_empty());
    }

    #[test]
    fn reclaim_drops_text_accumulated_on_ancestors() {
        // Mirrors a pretty-printed dump: whitespace between records lands on
        // the still-open root node and must not pile up across reclaims.
        let mut arena = NodeArena::new();
        let root = arena.alloc("mediawiki", true, None);
        for _ in 0..1000 {
            let page = arena.alloc("page", true, Some(root));
            arena.append_text(page, "body");
            arena.append_text(root, "\n    ");
            arena.reclaim(page);
        }
        assert_eq!(arena.live_nodes(), 1);
        assert_eq!(arena.retained_text_bytes(), 0);
    }

    #[test]
    fn retained_text_bytes_counts_live_nodes_only() {
        let mut arena = NodeArena::new();
        let root = arena.alloc("mediawiki", true, None);
        let page = arena.alloc("page", true, Some(root));
        let title = arena.alloc("title", true, Some(page));
        arena.append_text(title, "слово");
        assert_eq!(arena.retained_text_bytes(), "слово".len());
        arena.reclaim(page);
        assert_eq!(arena.retained_text_bytes(), 0);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = NodeArena::new();
        let root = arena.alloc("mediawiki", true, None);
        for _ in 0..100 {
            let page = arena.alloc("page", true, Some(root));
            arena.alloc("title", true, Some(page));
            arena.alloc("ns", true, Some(page));
            arena.reclaim(page);
        }
        // Slab never grew past one record's worth of slots.
        assert_eq!(arena.live_nodes(), 1);
        assert!(arena.peak_live_nodes() <= 4);
    }
}
