#![forbid(unsafe_code)]

//! In-memory document for deterministic tests.
//!
//! Nodes live in a shared arena; [`SimElement`] is an index into it, so
//! handles are cheap to clone and compare by identity just like DOM node
//! references. Each element carries a document-space [`Rect`] that the
//! simulated viewport measures against.
//!
//! # Selector support
//!
//! Compound selectors only: an optional tag followed by any number of
//! `.class`, `#id`, `[attr]` and `[attr="value"]` parts, e.g.
//! `img[data-src]` or `.dots__dot[data-slide="2"]`. Combinators are not
//! supported; an unparsable selector matches nothing.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Value, json};
use vitrine_core::element::{Document, Element};
use vitrine_core::watch::Rect;

const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
    rect: Rect,
}

#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    fn push(&mut self, tag: &str) -> usize {
        self.nodes.push(Node {
            tag: tag.to_owned(),
            ..Node::default()
        });
        self.nodes.len() - 1
    }

    fn descendants(&self, id: usize, out: &mut Vec<usize>) {
        for &child in &self.nodes[id].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn detach(&mut self, id: usize) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

fn parse_selector(selector: &str) -> Option<Compound> {
    let is_part_start = |c: char| matches!(c, '.' | '#' | '[');
    let mut rest = selector.trim();
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return None;
    }
    let mut compound = Compound::default();

    let tag_end = rest.find(is_part_start).unwrap_or(rest.len());
    if tag_end > 0 {
        compound.tag = Some(rest[..tag_end].to_ascii_lowercase());
    }
    rest = &rest[tag_end..];

    while let Some(first) = rest.chars().next() {
        match first {
            '.' | '#' => {
                let name_end = rest[1..]
                    .find(is_part_start)
                    .map_or(rest.len(), |i| i + 1);
                let name = &rest[1..name_end];
                if name.is_empty() {
                    return None;
                }
                if first == '.' {
                    compound.classes.push(name.to_owned());
                } else {
                    compound.id = Some(name.to_owned());
                }
                rest = &rest[name_end..];
            }
            '[' => {
                let close = rest.find(']')?;
                let inner = &rest[1..close];
                let attr = match inner.split_once('=') {
                    Some((name, value)) => (
                        name.trim().to_owned(),
                        Some(value.trim().trim_matches(['"', '\'']).to_owned()),
                    ),
                    None => (inner.trim().to_owned(), None),
                };
                if attr.0.is_empty() {
                    return None;
                }
                compound.attrs.push(attr);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn node_matches(node: &Node, compound: &Compound) -> bool {
    if compound.tag.as_deref().is_some_and(|tag| tag != node.tag) {
        return false;
    }
    if let Some(id) = &compound.id
        && node.attributes.get("id") != Some(id)
    {
        return false;
    }
    if !compound
        .classes
        .iter()
        .all(|class| node.classes.contains(class))
    {
        return false;
    }
    compound.attrs.iter().all(|(name, value)| {
        match (node.attributes.get(name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        }
    })
}

// ---------------------------------------------------------------------------
// SimDocument
// ---------------------------------------------------------------------------

/// Simulated document. Clones share the same tree.
#[derive(Clone)]
pub struct SimDocument {
    arena: Rc<RefCell<Arena>>,
    root: usize,
}

impl fmt::Debug for SimDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimDocument")
            .field("nodes", &self.arena.borrow().nodes.len())
            .finish()
    }
}

impl Default for SimDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDocument {
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Arena::default();
        let root = arena.push("body");
        Self {
            arena: Rc::new(RefCell::new(arena)),
            root,
        }
    }

    /// The `<body>` element every fixture hangs off.
    #[must_use]
    pub fn body(&self) -> SimElement {
        self.handle(self.root)
    }

    /// Create a detached element with classes.
    #[must_use]
    pub fn element(&self, tag: &str, classes: &[&str]) -> SimElement {
        let id = self.arena.borrow_mut().push(tag);
        let el = self.handle(id);
        for class in classes {
            el.add_class(class);
        }
        el
    }

    /// Number of elements attached under `<body>`.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        let arena = self.arena.borrow();
        let mut out = Vec::new();
        arena.descendants(self.root, &mut out);
        out.len()
    }

    /// Deterministic JSON snapshot of the attached tree.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let arena = self.arena.borrow();
        snapshot_node(&arena, self.root)
    }

    /// FNV-1a hash of [`snapshot`](Self::snapshot).
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let encoded = self.snapshot().to_string();
        let mut hash = FNV64_OFFSET_BASIS;
        for byte in encoded.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV64_PRIME);
        }
        hash
    }

    fn handle(&self, id: usize) -> SimElement {
        SimElement {
            arena: Rc::clone(&self.arena),
            id,
        }
    }

    fn matching_under(&self, id: usize, selector: &str) -> Vec<SimElement> {
        let Some(compound) = parse_selector(selector) else {
            return Vec::new();
        };
        let arena = self.arena.borrow();
        let mut ids = Vec::new();
        arena.descendants(id, &mut ids);
        ids.into_iter()
            .filter(|&i| node_matches(&arena.nodes[i], &compound))
            .map(|i| self.handle(i))
            .collect()
    }
}

fn snapshot_node(arena: &Arena, id: usize) -> Value {
    let node = &arena.nodes[id];
    json!({
        "tag": node.tag,
        "classes": node.classes,
        "attributes": node.attributes,
        "styles": node.styles,
        "text": node.text,
        "children": node
            .children
            .iter()
            .map(|&child| snapshot_node(arena, child))
            .collect::<Vec<_>>(),
    })
}

impl Document for SimDocument {
    type Element = SimElement;

    fn query(&self, selector: &str) -> Option<SimElement> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<SimElement> {
        self.matching_under(self.root, selector)
    }

    fn create_element(&self, tag: &str) -> Option<SimElement> {
        Some(self.element(tag, &[]))
    }
}

// ---------------------------------------------------------------------------
// SimElement
// ---------------------------------------------------------------------------

/// Handle to one simulated node.
#[derive(Clone)]
pub struct SimElement {
    arena: Rc<RefCell<Arena>>,
    id: usize,
}

impl PartialEq for SimElement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.arena, &other.arena)
    }
}

impl fmt::Debug for SimElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimElement({})", self.label())
    }
}

impl SimElement {
    /// Builder: add a class.
    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: set the document-space rectangle.
    #[must_use]
    pub fn with_rect(self, rect: Rect) -> Self {
        self.set_rect(rect);
        self
    }

    /// Builder: append to `parent` and return self.
    #[must_use]
    pub fn appended_to(self, parent: &SimElement) -> Self {
        parent.append_child(&self);
        self
    }

    pub fn set_rect(&self, rect: Rect) {
        self.arena.borrow_mut().nodes[self.id].rect = rect;
    }

    /// Document-space rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.arena.borrow().nodes[self.id].rect
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.arena.borrow().nodes[self.id].tag.clone()
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.arena.borrow().nodes[self.id]
            .styles
            .get(property)
            .cloned()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.arena.borrow().nodes[self.id].text.clone()
    }

    #[must_use]
    pub fn children(&self) -> Vec<SimElement> {
        self.arena.borrow().nodes[self.id]
            .children
            .iter()
            .map(|&id| SimElement {
                arena: Rc::clone(&self.arena),
                id,
            })
            .collect()
    }

    /// Whether the element is reachable from `<body>` (body itself included).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        let arena = self.arena.borrow();
        let mut id = self.id;
        loop {
            match arena.nodes[id].parent {
                Some(parent) => id = parent,
                None => return id == 0,
            }
        }
    }

    /// Short human-readable label: `tag#id.class.class`.
    #[must_use]
    pub fn label(&self) -> String {
        let arena = self.arena.borrow();
        let node = &arena.nodes[self.id];
        let mut label = node.tag.clone();
        if let Some(id) = node.attributes.get("id") {
            label.push('#');
            label.push_str(id);
        }
        for class in &node.classes {
            label.push('.');
            label.push_str(class);
        }
        label
    }

    fn doc(&self) -> SimDocument {
        SimDocument {
            arena: Rc::clone(&self.arena),
            root: 0,
        }
    }
}

impl Element for SimElement {
    fn has_class(&self, class: &str) -> bool {
        self.arena.borrow().nodes[self.id]
            .classes
            .iter()
            .any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        let mut arena = self.arena.borrow_mut();
        let classes = &mut arena.nodes[self.id].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        self.arena.borrow_mut().nodes[self.id]
            .classes
            .retain(|c| c != class);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.arena.borrow().nodes[self.id]
            .attributes
            .get(name)
            .cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.arena.borrow_mut().nodes[self.id]
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    fn set_style(&self, property: &str, value: &str) {
        self.arena.borrow_mut().nodes[self.id]
            .styles
            .insert(property.to_owned(), value.to_owned());
    }

    fn set_text(&self, text: &str) {
        self.arena.borrow_mut().nodes[self.id].text = text.to_owned();
    }

    fn parent(&self) -> Option<Self> {
        let parent = self.arena.borrow().nodes[self.id].parent?;
        Some(SimElement {
            arena: Rc::clone(&self.arena),
            id: parent,
        })
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        self.doc().matching_under(self.id, selector)
    }

    fn append_child(&self, child: &Self) {
        let mut arena = self.arena.borrow_mut();
        arena.detach(child.id);
        arena.nodes[child.id].parent = Some(self.id);
        arena.nodes[self.id].children.push(child.id);
    }

    fn remove(&self) {
        self.arena.borrow_mut().detach(self.id);
    }

    fn height(&self) -> f64 {
        self.rect().height
    }
}
