//! In-memory page for exercising the controller without a browser

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use crate::surface::Surface;

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: HashMap<String, String>,
    text: String,
    styles: BTreeMap<String, String>,
    parent: Option<usize>,
    children: Vec<usize>,
    offset_top: f64,
}

/// A tiny document tree. Elements are indices; index 0 is `<body>`.
#[derive(Debug)]
pub struct MockPage {
    nodes: RefCell<Vec<Node>>,
    scroll_y: Cell<f64>,
    max_scroll: Cell<f64>,
    dialogs: RefCell<Vec<String>>,
}

impl MockPage {
    pub fn new() -> Self {
        let body = Node {
            tag: "body".to_string(),
            ..Node::default()
        };
        MockPage {
            nodes: RefCell::new(vec![body]),
            scroll_y: Cell::new(0.0),
            max_scroll: Cell::new(f64::MAX),
            dialogs: RefCell::new(Vec::new()),
        }
    }

    pub fn body(&self) -> usize {
        0
    }

    pub fn add(&self, parent: usize, tag: &str, classes: &[&str]) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.len();
        nodes.push(Node {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: Some(parent),
            ..Node::default()
        });
        nodes[parent].children.push(id);
        id
    }

    pub fn set_attr(&self, node: usize, name: &str, value: &str) {
        self.nodes.borrow_mut()[node]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_text_of(&self, node: usize, text: &str) {
        self.nodes.borrow_mut()[node].text = text.to_string();
    }

    pub fn set_offset_top(&self, node: usize, top: f64) {
        self.nodes.borrow_mut()[node].offset_top = top;
    }

    pub fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    pub fn set_max_scroll(&self, max: f64) {
        self.max_scroll.set(max);
    }

    pub fn style_of(&self, node: usize, property: &str) -> Option<String> {
        self.nodes.borrow()[node].styles.get(property).cloned()
    }

    pub fn dialogs(&self) -> Vec<String> {
        self.dialogs.borrow().clone()
    }

    pub fn is_attached(&self, node: usize) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = node;
        while let Some(parent) = nodes[current].parent {
            current = parent;
        }
        current == self.body()
    }

    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<usize> {
        self.attached_nodes()
            .into_iter()
            .find(|&n| self.nodes.borrow()[n].attrs.get(name).map(String::as_str) == Some(value))
    }

    /// Attached nodes in document order, body excluded
    fn attached_nodes(&self) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut order = Vec::new();
        let mut stack: Vec<usize> = nodes[0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(nodes[node].children.iter().rev().copied());
        }
        order
    }

    fn descendants(&self, root: usize) -> Vec<usize> {
        self.attached_nodes()
            .into_iter()
            .filter(|&n| n != root && self.is_ancestor(root, n))
            .collect()
    }

    fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = nodes[node].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = nodes[parent].parent;
        }
        false
    }

    /// Supports descendant combinators over `tag`, `.class` and
    /// `:first-child` compounds, which is all the guide uses.
    fn matches(&self, node: usize, selector: &str) -> bool {
        let mut parts: Vec<&str> = selector.split_whitespace().collect();
        let Some(last) = parts.pop() else {
            return false;
        };
        if !self.matches_compound(node, last) {
            return false;
        }

        let nodes = self.nodes.borrow();
        let mut current = nodes[node].parent;
        drop(nodes);
        while let Some(part) = parts.last() {
            let Some(ancestor) = current else {
                return false;
            };
            if self.matches_compound(ancestor, part) {
                parts.pop();
            }
            current = self.nodes.borrow()[ancestor].parent;
        }
        true
    }

    fn matches_compound(&self, node: usize, compound: &str) -> bool {
        let nodes = self.nodes.borrow();
        let element = &nodes[node];

        let (compound, first_child) = match compound.strip_suffix(":first-child") {
            Some(rest) => (rest, true),
            None => (compound, false),
        };
        if first_child {
            let is_first = element
                .parent
                .map_or(false, |p| nodes[p].children.first() == Some(&node));
            if !is_first {
                return false;
            }
        }

        let mut pieces = compound.split('.');
        let tag = pieces.next().unwrap_or_default();
        if !tag.is_empty() && tag != element.tag {
            return false;
        }
        pieces.all(|class| element.classes.iter().any(|c| c == class))
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MockPage {
    type Element = usize;

    fn query_all(&self, selector: &str) -> Vec<usize> {
        self.attached_nodes()
            .into_iter()
            .filter(|&n| self.matches(n, selector))
            .collect()
    }

    fn query(&self, selector: &str) -> Option<usize> {
        self.query_all(selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<usize> {
        self.find_by_attr("id", id)
    }

    fn closest(&self, element: &usize, selector: &str) -> Option<usize> {
        let mut current = Some(*element);
        while let Some(node) = current {
            if node != self.body() && self.matches(node, selector) {
                return Some(node);
            }
            current = self.nodes.borrow()[node].parent;
        }
        None
    }

    fn find_within(&self, element: &usize, selector: &str) -> Option<usize> {
        self.descendants(*element)
            .into_iter()
            .find(|&n| self.matches(n, selector))
    }

    fn attribute(&self, element: &usize, name: &str) -> Option<String> {
        self.nodes.borrow()[*element].attrs.get(name).cloned()
    }

    fn set_attribute(&self, element: &usize, name: &str, value: &str) {
        self.set_attr(*element, name, value);
    }

    fn text(&self, element: &usize) -> String {
        self.nodes.borrow()[*element].text.clone()
    }

    fn set_text(&self, element: &usize, text: &str) {
        self.set_text_of(*element, text);
    }

    fn set_style(&self, element: &usize, property: &str, value: &str) {
        self.nodes.borrow_mut()[*element]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn clear_style(&self, element: &usize, property: &str) {
        self.nodes.borrow_mut()[*element].styles.remove(property);
    }

    fn create_element(&self, tag: &str) -> Option<usize> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        Some(nodes.len() - 1)
    }

    fn append_to_body(&self, element: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[*element].parent = Some(0);
        nodes[0].children.push(*element);
    }

    fn remove(&self, element: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[*element].parent.take() {
            nodes[parent].children.retain(|c| c != element);
        }
    }

    fn offset_top(&self, element: &usize) -> f64 {
        self.nodes.borrow()[*element].offset_top
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, top: f64) {
        self.scroll_y.set(top.clamp(0.0, self.max_scroll.get()));
    }

    fn alert(&self, message: &str) {
        self.dialogs.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matching() {
        let page = MockPage::new();
        let footer = page.add(page.body(), "footer", &[]);
        let first = page.add(footer, "p", &[]);
        page.add(footer, "p", &[]);
        let table = page.add(page.body(), "table", &["comparison-table", "wide"]);
        let row = page.add(table, "tr", &[]);

        assert_eq!(page.query("footer p:first-child"), Some(first));
        assert_eq!(page.query_all(".comparison-table tr"), vec![row]);
        assert_eq!(page.query_all("table.wide"), vec![table]);
        assert_eq!(page.query(".nav-links a"), None);
    }

    #[test]
    fn test_detached_nodes_are_invisible_to_queries() {
        let page = MockPage::new();
        let div = page.create_element("div").unwrap();
        page.set_attr(div, "id", "floating");

        assert_eq!(page.element_by_id("floating"), None);
        page.append_to_body(&div);
        assert_eq!(page.element_by_id("floating"), Some(div));
        page.remove(&div);
        assert!(!page.is_attached(div));
    }
}
