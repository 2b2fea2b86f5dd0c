//! Building documents from HTML with `scraper`.

use scraper::{Html, Node as HtmlNode};

use super::document::Document;

impl Document {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self::build(&Html::parse_document(html), false)
    }

    /// Parse an HTML fragment into a detached `<div>` container.
    ///
    /// The container is the only child of the root, so headings inside the
    /// fragment can be scanned like a document but share nothing with the
    /// live page.
    pub fn parse_fragment(html: &str) -> Self {
        Self::build(&Html::parse_fragment(html), true)
    }

    fn build(parsed: &Html, into_container: bool) -> Self {
        let mut document = Document::new();
        let mut parent = document.root();
        if into_container {
            let container = document.create_element("div");
            document.append_child(parent, container);
            parent = container;
        }

        // Fragments are wrapped in a synthetic <html> element by the parser.
        let top_level = if into_container {
            parsed.root_element().children()
        } else {
            parsed.tree.root().children()
        };

        let mut stack: Vec<_> = top_level.map(|node| (node, parent)).collect();
        stack.reverse();
        while let Some((node, parent)) = stack.pop() {
            let created = match node.value() {
                HtmlNode::Element(element) => {
                    let id = document.create_element(element.name());
                    for (name, value) in element.attrs() {
                        document.set_attribute(id, name, value);
                    }
                    id
                }
                HtmlNode::Text(text) => document.create_text(text),
                _ => continue,
            };
            document.append_child(parent, created);

            let mut children: Vec<_> = node.children().map(|child| (child, created)).collect();
            children.reverse();
            stack.extend(children);
        }
        document
    }
}
