//! Directory hierarchy from flat object keys
//!
//! Object stores only know flat keys. [`ObjectKeyTree`] rebuilds the folder
//! structure implied by the delimiter so a recursive listing can be shown with
//! single-child chains collapsed into one row.

use crate::object::DELIMITER;

#[derive(Debug)]
struct Node<T> {
    name: String,
    item: Option<T>,
    children: Vec<usize>,
}

/// Tree of key segments, nodes stored in an arena
#[derive(Debug)]
pub struct ObjectKeyTree<T> {
    nodes: Vec<Node<T>>,
}

/// A top-level entry of the tree with its collapsed name
#[derive(Debug, PartialEq, Eq)]
pub struct RootItem<'a, T> {
    pub name: String,
    pub item: Option<&'a T>,
}

impl<T> Default for ObjectKeyTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectKeyTree<T> {
    const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: String::new(),
                item: None,
                children: Vec::new(),
            }],
        }
    }

    /// Insert `item` under the path described by `name`
    ///
    /// Adding a name that already exists replaces its item.
    pub fn add_object(&mut self, name: &str, item: T) {
        let segments = split_object_name(name);
        if segments.is_empty() {
            return;
        }

        let mut current = Self::ROOT;
        for segment in segments {
            current = match self.child(current, segment) {
                Some(existing) => existing,
                None => self.push_child(current, segment),
            };
        }
        self.nodes[current].item = Some(item);
    }

    /// Direct children of the root, each collapsed through single-child chains
    pub fn list_root_items(&self) -> Vec<RootItem<'_, T>> {
        self.nodes[Self::ROOT]
            .children
            .iter()
            .map(|&child| {
                let mut name = String::new();
                let mut current = child;
                loop {
                    let node = &self.nodes[current];
                    name.push_str(&node.name);
                    match node.children.as_slice() {
                        [only] => current = *only,
                        _ => {
                            return RootItem {
                                name,
                                item: node.item.as_ref(),
                            };
                        }
                    }
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].children.is_empty()
    }

    fn child(&self, parent: usize, name: &str) -> Option<usize> {
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&idx| self.nodes[idx].name == name)
    }

    fn push_child(&mut self, parent: usize, name: &str) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            item: None,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }
}

/// Split a key into segments, each non-final segment keeping its delimiters
///
/// Leading delimiters belong to the first segment and a run of delimiters
/// stays attached to the segment it terminates.
pub fn split_object_name(name: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = name.char_indices().peekable();

    // leading run belongs to the first segment
    while chars.next_if(|&(_, c)| c == DELIMITER).is_some() {}

    while let Some((_, c)) = chars.next() {
        if c != DELIMITER {
            continue;
        }
        while chars.next_if(|&(_, c)| c == DELIMITER).is_some() {}
        let end = chars.peek().map_or(name.len(), |&(idx, _)| idx);
        segments.push(&name[start..end]);
        start = end;
    }

    if start < name.len() {
        segments.push(&name[start..]);
    }
    segments
}
