//! The view arena of one session: insert, remove, walk, look up by HTML id.

use std::collections::{HashMap, VecDeque};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::view::view::View;

new_key_type! {
    /// Handle of a view inside its session's [`ViewTree`].
    pub struct ViewId;
}

const EMPTY_CHILDREN: &[ViewId] = &[];

/// Every view of a session, backed by a slotmap arena.
///
/// Parent/child links live in secondary maps so removal is O(subtree) and
/// lookup is O(1). Each inserted view gets a unique HTML id (`id1`, `id2`, ...).
#[derive(Debug, Default)]
pub struct ViewTree {
    views: SlotMap<ViewId, View>,
    children: SecondaryMap<ViewId, Vec<ViewId>>,
    parent: SecondaryMap<ViewId, ViewId>,
    by_html_id: HashMap<String, ViewId>,
    root: Option<ViewId>,
    next_html_id: u64,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, mut view: View) -> ViewId {
        self.next_html_id += 1;
        let html_id = format!("id{}", self.next_html_id);
        view.set_html_id(html_id.clone());
        let id = self.views.insert(view);
        self.children.insert(id, Vec::new());
        self.by_html_id.insert(html_id, id);
        id
    }

    /// Insert a parentless view. The first one becomes the root.
    pub fn insert(&mut self, view: View) -> ViewId {
        let id = self.register(view);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Append `view` to the children of `parent`; `None` if `parent` is gone.
    pub fn insert_child(&mut self, parent: ViewId, view: View) -> Option<ViewId> {
        if !self.views.contains_key(parent) {
            return None;
        }
        let id = self.register(view);
        self.parent.insert(id, parent);
        self.children.get_mut(parent)?.push(id);
        Some(id)
    }

    /// Remove a view and its subtree, returning the view itself.
    pub fn remove(&mut self, id: ViewId) -> Option<View> {
        if !self.views.contains_key(id) {
            return None;
        }
        if let Some(parent) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&child| child != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut queue = VecDeque::from([id]);
        let mut removed = None;
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            if let Some(view) = self.views.remove(current) {
                self.by_html_id.remove(view.html_id());
                if current == id {
                    removed = Some(view);
                }
            }
        }
        removed
    }

    /// Drop every view.
    pub fn clear(&mut self) {
        self.views.clear();
        self.children.clear();
        self.parent.clear();
        self.by_html_id.clear();
        self.root = None;
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.parent.get(id).copied()
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent.get(current).copied() {
            result.push(parent);
            current = parent;
        }
        result
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(id)
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn set_root(&mut self, id: ViewId) {
        self.root = Some(id);
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn by_html_id(&self, html_id: &str) -> Option<ViewId> {
        self.by_html_id.get(html_id).copied()
    }

    /// First view under `start` (pre-order) whose `id` property is `id`.
    pub fn find(&self, start: ViewId, id: &str) -> Option<ViewId> {
        self.walk_depth_first(start)
            .into_iter()
            .find(|&view| self.views.get(view).and_then(View::id) == Some(id))
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.views.contains_key(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }
}
