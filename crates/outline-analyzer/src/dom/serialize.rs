//! Serializing documents back to HTML.

use super::document::{Document, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl Document {
    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut steps: Vec<Step> = self
            .children(node)
            .iter()
            .rev()
            .map(|child| Step::Open(*child))
            .collect();

        while let Some(step) = steps.pop() {
            match step {
                Step::Close(id) => {
                    if let Some(tag) = self.tag(id) {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }
                Step::Open(id) => {
                    if let Some(text) = self.text(id) {
                        let raw = self
                            .parent(id)
                            .and_then(|p| self.tag(p))
                            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                        if raw {
                            out.push_str(text);
                        } else {
                            escape_text(text, &mut out);
                        }
                        continue;
                    }
                    let Some(tag) = self.tag(id) else {
                        continue;
                    };
                    out.push('<');
                    out.push_str(tag);
                    for (name, value) in self.attributes(id) {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        escape_attribute(value, &mut out);
                        out.push('"');
                    }
                    out.push('>');
                    if VOID_ELEMENTS.contains(&tag) {
                        continue;
                    }
                    steps.push(Step::Close(id));
                    steps.extend(self.children(id).iter().rev().map(|c| Step::Open(*c)));
                }
            }
        }
        out
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
