use html5ever::QualName;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use url::Url;

pub mod dom_tree {
    use super::*;

    /// Shared handle to a node of the tree.
    pub type NodeRef = Rc<RefCell<Node>>;

    #[derive(Debug, Clone)]
    pub enum Node {
        DocumentRoot(DocumentRootNode),
        Element(ElementNode),
        Text(String),
    }

    #[derive(Debug, Clone, Default)]
    pub struct DocumentRootNode {
        pub children: Vec<NodeRef>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        pub attributes: Vec<(String, String)>,
        pub children: Vec<NodeRef>,
        pub parent: Option<Weak<RefCell<Node>>>,
        /// Fragment holding the contents of a `<template>`; never part of the
        /// rendered tree.
        pub template_contents: Option<NodeRef>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: NodeRef,
        pub doctype: RefCell<Option<Doctype>>,
        /// Base URL the markup was loaded from, if any.
        pub base_url: Option<Url>,
    }

    #[derive(Debug)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl DocumentRootNode {
        pub fn new() -> Self {
            DocumentRootNode {
                children: Vec::new(),
            }
        }
    }

    impl ElementNode {
        pub fn new(tag: String, qual_name: QualName) -> Self {
            ElementNode {
                tag,
                qual_name,
                attributes: Vec::new(),
                children: Vec::new(),
                parent: None,
                template_contents: None,
            }
        }

        /// Value of the first attribute called `name`. Names are stored
        /// lowercased by the HTML parser.
        pub fn attr(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }

        pub fn classes(&self) -> impl Iterator<Item = &str> {
            self.attr("class").unwrap_or_default().split_whitespace()
        }
    }

    impl Node {
        pub fn children(&self) -> &[NodeRef] {
            match self {
                Node::DocumentRoot(root) => &root.children,
                Node::Element(elem) => &elem.children,
                Node::Text(_) => &[],
            }
        }

        pub fn children_mut(&mut self) -> Option<&mut Vec<NodeRef>> {
            match self {
                Node::DocumentRoot(root) => Some(&mut root.children),
                Node::Element(elem) => Some(&mut elem.children),
                Node::Text(_) => None,
            }
        }

        pub fn as_element(&self) -> Option<&ElementNode> {
            match self {
                Node::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn is_element(&self) -> bool {
            matches!(self, Node::Element(_))
        }
    }

    /// Parent of `node`, element or document root. Only elements track
    /// their parent.
    pub fn parent_of(node: &NodeRef) -> Option<NodeRef> {
        match &*node.borrow() {
            Node::Element(elem) => elem.parent.as_ref().and_then(Weak::upgrade),
            _ => None,
        }
    }

    /// Parent of `node` when that parent is itself an element.
    pub fn parent_element(node: &NodeRef) -> Option<NodeRef> {
        parent_of(node).filter(|parent| parent.borrow().is_element())
    }

    /// Element siblings of `node` (itself included) in document order, with
    /// the position of `node` among them.
    pub fn element_siblings(node: &NodeRef) -> Option<(Vec<NodeRef>, usize)> {
        let parent = parent_of(node)?;
        let parent = parent.borrow();
        let siblings: Vec<NodeRef> = parent
            .children()
            .iter()
            .filter(|child| child.borrow().is_element())
            .cloned()
            .collect();
        let index = siblings.iter().position(|s| Rc::ptr_eq(s, node))?;
        Some((siblings, index))
    }

    pub fn new_document(base_url: Option<Url>) -> Document {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::new()))),
            doctype: RefCell::new(None),
            base_url,
        }
    }
}
