//! The element-query and style-mutation surface the page controller drives.
//!
//! Everything the controller does to the page is expressed as a [`Patch`]
//! and applied through a [`Surface`], so the behaviors run the same against
//! the real document and against the in-memory page used by the tests.

/// Access to the page's elements
pub trait Surface {
    type Element: Clone + PartialEq;

    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Nearest ancestor (or the element itself) matching `selector`
    fn closest(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;
    /// First descendant matching `selector`
    fn find_within(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);
    fn text(&self, element: &Self::Element) -> String;
    fn set_text(&self, element: &Self::Element, text: &str);

    fn set_style(&self, element: &Self::Element, property: &str, value: &str);
    fn clear_style(&self, element: &Self::Element, property: &str);

    fn create_element(&self, tag: &str) -> Option<Self::Element>;
    fn append_to_body(&self, element: &Self::Element);
    fn remove(&self, element: &Self::Element);

    /// Distance from the element's top to the top of the document
    fn offset_top(&self, element: &Self::Element) -> f64;
    /// Current vertical scroll offset of the viewport
    fn scroll_y(&self) -> f64;
    /// Smoothly scroll the viewport to `top`
    fn scroll_to(&self, top: f64);

    /// Blocking informational dialog
    fn alert(&self, message: &str);
}

/// A single change to the page
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<E> {
    Style {
        target: E,
        property: &'static str,
        value: String,
    },
    ClearStyle {
        target: E,
        property: &'static str,
    },
    Text {
        target: E,
        text: String,
    },
    ScrollTo(f64),
    Alert(String),
    Append(E),
    Remove(E),
}

impl<E> Patch<E> {
    pub fn style(target: E, property: &'static str, value: impl Into<String>) -> Self {
        Patch::Style {
            target,
            property,
            value: value.into(),
        }
    }

    pub fn apply<S>(&self, surface: &S)
    where
        S: Surface<Element = E>,
    {
        match self {
            Patch::Style { target, property, value } => surface.set_style(target, property, value),
            Patch::ClearStyle { target, property } => surface.clear_style(target, property),
            Patch::Text { target, text } => surface.set_text(target, text),
            Patch::ScrollTo(top) => surface.scroll_to(*top),
            Patch::Alert(message) => surface.alert(message),
            Patch::Append(element) => surface.append_to_body(element),
            Patch::Remove(element) => surface.remove(element),
        }
    }
}

/// Apply patches in order
pub fn apply_all<S: Surface>(surface: &S, patches: &[Patch<S::Element>]) {
    for patch in patches {
        patch.apply(surface);
    }
}
