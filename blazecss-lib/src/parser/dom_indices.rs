use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::dom_tree::{Document, Node, NodeRef};

/// Global indexes for fast DOM lookup.
///
/// Selector queries use them to pick candidate elements for the rightmost
/// compound selector instead of scanning the whole tree.
#[derive(Debug, Default)]
pub struct DomIndices {
    /// Every element, in document order.
    pub elements: Vec<NodeRef>,
    /// Maps an element's "id" attribute to the nodes carrying it.
    pub id_map: HashMap<String, Vec<NodeRef>>,
    /// Maps a class name to all nodes that have that class.
    pub class_map: HashMap<String, Vec<NodeRef>>,
    /// Maps a lowercase tag name (e.g., "div") to all nodes with that tag.
    pub tag_map: HashMap<String, Vec<NodeRef>>,
}

impl DomIndices {
    /// Build the indices for the entire document.
    pub fn build(document: &Document) -> Self {
        let mut indices = DomIndices::default();
        Self::traverse(&document.root, &mut indices);
        log::debug!(
            "indexed {} elements ({} ids, {} classes, {} tags)",
            indices.elements.len(),
            indices.id_map.len(),
            indices.class_map.len(),
            indices.tag_map.len()
        );
        indices
    }

    /// Recursively traverse the DOM tree and populate the indices.
    fn traverse(node: &NodeRef, indices: &mut DomIndices) {
        match &*node.borrow() {
            Node::DocumentRoot(root) => {
                for child in &root.children {
                    Self::traverse(child, indices);
                }
            }
            Node::Element(elem) => {
                indices.elements.push(Rc::clone(node));
                indices
                    .tag_map
                    .entry(elem.tag.to_lowercase())
                    .or_default()
                    .push(Rc::clone(node));

                if let Some(id_value) = elem.attr("id") {
                    indices
                        .id_map
                        .entry(id_value.to_string())
                        .or_default()
                        .push(Rc::clone(node));
                }
                for class in elem.classes() {
                    let nodes = indices.class_map.entry(class.to_string()).or_default();
                    // `class="a a"` must not index the node twice.
                    if !nodes.last().is_some_and(|last| Rc::ptr_eq(last, node)) {
                        nodes.push(Rc::clone(node));
                    }
                }
                // Template contents live outside the rendered tree.
                for child in &elem.children {
                    Self::traverse(child, indices);
                }
            }
            Node::Text(_) => {}
        }
    }

    pub fn by_id(&self, id: &str) -> &[NodeRef] {
        self.id_map.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn by_class(&self, class: &str) -> &[NodeRef] {
        self.class_map.get(class).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn by_tag(&self, tag: &str) -> &[NodeRef] {
        self.tag_map.get(tag).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blaze_html::create_dom_tree;

    #[test]
    fn test_indices_cover_ids_classes_and_tags() {
        let document = create_dom_tree(
            r#"<div id="main" class="a b"><p class="a a">x</p><template><span class="t"></span></template></div>"#,
            None,
        );
        let indices = DomIndices::build(&document);

        assert_eq!(indices.by_id("main").len(), 1);
        assert_eq!(indices.by_class("a").len(), 2);
        assert_eq!(indices.by_class("b").len(), 1);
        assert_eq!(indices.by_tag("p").len(), 1);
        assert!(indices.by_class("t").is_empty());
        assert!(indices.by_tag("span").is_empty());
        // html, head, body, div, p, template
        assert_eq!(indices.elements.len(), 6);
    }
}
