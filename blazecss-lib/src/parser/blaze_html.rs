//! This module contains functions and types for parsing HTML into a custom DOM tree.
//!
//! It uses html5ever as the HTML parser and builds a DOM tree defined in the
//! `crate::dom::dom_tree` module. The tree is what selector queries run
//! against, so it follows the parser's tree-construction callbacks closely
//! (including node moves for misnested and table markup).

use crate::dom::dom_tree::{self, NodeRef};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    LocalName, Namespace, QualName,
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

/// Creates a DOM tree from the provided HTML content.
///
/// # Arguments
///
/// * `html_content` - A string slice containing the HTML to parse.
/// * `base_url` - The URL the document was loaded from, if known.
///
/// # Returns
///
/// A `dom_tree::Document` representing the parsed HTML. HTML parsing never
/// fails; malformed markup is repaired the way browsers do.
pub fn create_dom_tree(html_content: &str, base_url: Option<Url>) -> dom_tree::Document {
    let tree_sink = BlazeTreeSink::new(base_url);
    html5ever::parse_document(tree_sink, Default::default()).one(html_content)
}

/// A custom TreeSink for building the DOM tree used by the parser.
///
/// It holds the Document being built and the current quirks mode.
pub struct BlazeTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl BlazeTreeSink {
    /// Creates a new `BlazeTreeSink` with an empty document.
    pub fn new(base_url: Option<Url>) -> Self {
        Self {
            document: dom_tree::new_document(base_url),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    fn into_node(child: NodeOrText<NodeRef>) -> NodeRef {
        match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                Rc::new(RefCell::new(dom_tree::Node::Text(text.to_string())))
            }
        }
    }
}

/// Points `child` at `parent`, when `child` is an element.
fn set_parent(child: &NodeRef, parent: Option<&NodeRef>) {
    if let dom_tree::Node::Element(ref mut elem) = *child.borrow_mut() {
        elem.parent = parent.map(Rc::downgrade);
    }
}

/// A simple implementation of the `ElemName` trait for our elements.
#[derive(Debug)]
pub struct BlazeElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for BlazeElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for BlazeTreeSink {
    type Handle = NodeRef;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = BlazeElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::trace!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    /// Returns the element name for the given handle. The parser only asks
    /// for names of elements; anything else gets an empty name.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match *target.borrow() {
            dom_tree::Node::Element(ref elem) => BlazeElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            _ => BlazeElemName {
                ns: Namespace::from(""),
                local: LocalName::from(""),
            },
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let mut element_node = dom_tree::ElementNode::new(name.local.to_string(), name);
        element_node.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        if flags.template {
            element_node.template_contents = Some(Rc::new(RefCell::new(
                dom_tree::Node::DocumentRoot(dom_tree::DocumentRootNode::new()),
            )));
        }
        Rc::new(RefCell::new(dom_tree::Node::Element(element_node)))
    }

    /// Comments take no part in selector matching; keep an empty text node.
    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(dom_tree::Node::Text(String::new())))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let combined = format!("{} {}", target, data);
        Rc::new(RefCell::new(dom_tree::Node::Text(combined)))
    }

    /// Appends a child node or text to the given parent node, merging
    /// adjacent text.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        if let NodeOrText::AppendText(ref text) = child {
            let mut parent_borrow = parent.borrow_mut();
            if let Some(last) = parent_borrow
                .children_mut()
                .and_then(|children| children.last())
            {
                if let dom_tree::Node::Text(ref mut existing) = *last.borrow_mut() {
                    existing.push_str(text);
                    return;
                }
            }
        }

        let child_node = Self::into_node(child);
        set_parent(&child_node, Some(parent));
        if let Some(children) = parent.borrow_mut().children_mut() {
            children.push(child_node);
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if dom_tree::parent_of(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        match *target.borrow() {
            dom_tree::Node::Element(ref elem) => elem
                .template_contents
                .clone()
                .unwrap_or_else(|| target.clone()),
            _ => target.clone(),
        }
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    /// Inserts a node right before `sibling` in its parent (foster parenting).
    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let Some(parent) = dom_tree::parent_of(sibling) else {
            return;
        };
        let child_node = Self::into_node(child);
        set_parent(&child_node, Some(&parent));
        let mut parent_borrow = parent.borrow_mut();
        if let Some(children) = parent_borrow.children_mut() {
            let index = children
                .iter()
                .position(|c| Rc::ptr_eq(c, sibling))
                .unwrap_or(children.len());
            children.insert(index, child_node);
        }
    }

    /// Adds attributes to the target node if they are missing.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        if let dom_tree::Node::Element(ref mut elem_node) = *target.borrow_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if !elem_node.attributes.iter().any(|(k, _)| k == &key) {
                    elem_node.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        if let Some(parent) = dom_tree::parent_of(target) {
            if let Some(children) = parent.borrow_mut().children_mut() {
                children.retain(|c| !Rc::ptr_eq(c, target));
            }
        }
        set_parent(target, None);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let moved = match node.borrow_mut().children_mut() {
            Some(children) => std::mem::take(children),
            None => return,
        };
        for child in &moved {
            set_parent(child, Some(new_parent));
        }
        if let Some(children) = new_parent.borrow_mut().children_mut() {
            children.extend(moved);
        }
    }
}
