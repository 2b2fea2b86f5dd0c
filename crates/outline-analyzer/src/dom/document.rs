//! Arena document: nodes, attributes, classes and tree mutation.

use super::dom_types::BoundingBox;

/// Handle of a node inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

#[derive(Debug, Clone)]
pub(super) enum NodeData {
    Root,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub(super) struct Node {
    pub(super) data: NodeData,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) bounds: BoundingBox,
}

/// A page document or a detached fragment container.
#[derive(Debug, Clone)]
pub struct Document {
    pub(super) nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
                bounds: BoundingBox::default(),
            }],
        }
    }

    /// The root node. Elements reachable from it are attached.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
            bounds: BoundingBox::default(),
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Remove an element (and its subtree) from the document.
    ///
    /// The handle stays valid: attribute and class operations on it keep
    /// working, but id lookups no longer find it.
    pub fn remove_element(&mut self, node: NodeId) {
        if node != self.root() {
            self.detach(node);
        }
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root() {
                return true;
            }
            match self.nodes.get(current.0).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Lowercase tag name, `None` for text and root nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.tag(node).is_some()
    }

    /// Direct text of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub(super) fn attributes(&self, node: NodeId) -> &[(String, String)] {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs.as_slice(),
            _ => &[],
        }
    }

    /// Set an attribute on an element. No-op on non-elements.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(Node {
            data: NodeData::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(node.0)
        {
            match attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(Node {
            data: NodeData::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(node.0)
        {
            attrs.retain(|(key, _)| key != name);
        }
    }

    /// The element's `id`, ignoring empty values.
    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    pub fn set_element_id(&mut self, node: NodeId, id: &str) {
        self.set_attribute(node, "id", id);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|value| value.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.is_element(node) || self.has_class(node, class) {
            return;
        }
        let value = match self.attribute(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &value);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(existing) = self.attribute(node, "class") else {
            return;
        };
        let remaining: Vec<&str> = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect();
        if remaining.is_empty() {
            self.remove_attribute(node, "class");
        } else {
            let value = remaining.join(" ");
            self.set_attribute(node, "class", &value);
        }
    }

    /// Nodes below `node` in document order (pre-order), excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Attached elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root())
            .into_iter()
            .filter(move |node| self.is_element(*node))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Heading level from the tag name (`h1` → 1 .. `h6` → 6).
    pub fn heading_level(&self, node: NodeId) -> Option<u8> {
        match self.tag(node)? {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// All attached `h1`..`h6` elements in document order.
    pub fn headings(&self) -> Vec<NodeId> {
        self.elements()
            .filter(|node| self.heading_level(*node).is_some())
            .collect()
    }

    /// First attached element carrying `id`, like `getElementById`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.elements().find(|node| self.element_id(*node) == Some(id))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get_element_by_id(id).is_some()
    }

    /// Attached elements carrying a class.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.elements()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    /// First attached element with the given tag.
    pub fn first_element_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.elements().find(|node| self.tag(*node) == Some(tag))
    }

    /// Append `<style id=..>css</style>` to `<head>` unless an element with
    /// that id already exists. Returns whether a style sheet was inserted.
    pub fn ensure_style(&mut self, style_id: &str, css: &str) -> bool {
        if self.contains_id(style_id) {
            return false;
        }
        let head = match self.first_element_by_tag("head") {
            Some(head) => head,
            None => {
                let head = self.create_element("head");
                let parent = self.first_element_by_tag("html").unwrap_or(self.root());
                self.append_child(parent, head);
                head
            }
        };
        let style = self.create_element("style");
        self.set_element_id(style, style_id);
        let text = self.create_text(css);
        self.append_child(style, text);
        self.append_child(head, style);
        true
    }

    /// `<title>` text, trimmed.
    pub fn title(&self) -> Option<String> {
        let title = self.first_element_by_tag("title")?;
        let text = self.text_content(title);
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn bounds(&self, node: NodeId) -> BoundingBox {
        self.nodes
            .get(node.0)
            .map(|n| n.bounds.clone())
            .unwrap_or_default()
    }

    pub fn set_bounds(&mut self, node: NodeId, bounds: BoundingBox) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.bounds = bounds;
        }
    }

    /// Total laid-out height of the document.
    pub fn content_height(&self) -> f64 {
        self.bounds(self.root()).height
    }
}
