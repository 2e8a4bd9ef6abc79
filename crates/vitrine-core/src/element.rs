#![forbid(unsafe_code)]

//! Host document abstraction.
//!
//! Every component in this crate manipulates the page through the
//! [`Element`] and [`Document`] traits only. The browser build implements
//! them over `web_sys`, the test harness over an in-memory tree. Handles are
//! cheap to clone and compare by identity, like DOM node references.
//!
//! Mutations are infallible from the caller's point of view: the markup is
//! static and trusted, so a host that cannot apply a class or style change
//! logs it and moves on.

use std::fmt;

/// A handle to one element of the host document.
pub trait Element: Clone + PartialEq + fmt::Debug {
    /// Whether the element's class list contains `class`.
    fn has_class(&self, class: &str) -> bool;

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    /// Attribute value, or `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str);

    /// Set one inline style property (kebab-case CSS name).
    fn set_style(&self, property: &str, value: &str);

    fn set_text(&self, text: &str);

    /// Parent element, `None` at the root or once detached.
    fn parent(&self) -> Option<Self>;

    /// First descendant matching `selector`.
    fn query(&self, selector: &str) -> Option<Self>;

    /// All descendants matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self>;

    fn append_child(&self, child: &Self);

    /// Detach the element from the document.
    fn remove(&self);

    /// Rendered height in CSS pixels (bounding client rect).
    fn height(&self) -> f64;

    /// Nearest inclusive ancestor carrying `class`.
    fn closest_with_class(&self, class: &str) -> Option<Self> {
        let mut node = Some(self.clone());
        while let Some(current) = node {
            if current.has_class(class) {
                return Some(current);
            }
            node = current.parent();
        }
        None
    }

    /// Whether `ancestor` is this element or one of its ancestors.
    fn is_within(&self, ancestor: &Self) -> bool {
        let mut node = Some(self.clone());
        while let Some(current) = node {
            if &current == ancestor {
                return true;
            }
            node = current.parent();
        }
        false
    }
}

/// Document-level lookup and element creation.
pub trait Document {
    type Element: Element;

    /// First element in the document matching `selector`.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// All elements in the document matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Create a detached element with the given tag name.
    fn create_element(&self, tag: &str) -> Option<Self::Element>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! Minimal flat element used by unit tests in this crate.
    //!
    //! No selector engine: `query_all` matches direct children by a single
    //! class (`.name`) or tag name, which is all the unit tests need.

    use super::Element;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fmt;
    use std::rc::Rc;

    #[derive(Default)]
    struct Node {
        tag: String,
        classes: Vec<String>,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        text: String,
        parent: Option<FakeElement>,
        children: Vec<FakeElement>,
        removed: bool,
        height: f64,
    }

    #[derive(Clone, Default)]
    pub(crate) struct FakeElement(Rc<RefCell<Node>>);

    // Parent and child links form cycles, so only the node itself is printed.
    impl fmt::Debug for FakeElement {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let node = self.0.borrow();
            f.debug_struct("FakeElement")
                .field("tag", &node.tag)
                .field("classes", &node.classes)
                .field("attributes", &node.attributes)
                .finish()
        }
    }

    impl PartialEq for FakeElement {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    impl FakeElement {
        pub(crate) fn new(tag: &str) -> Self {
            let el = Self::default();
            el.0.borrow_mut().tag = tag.to_owned();
            el
        }

        pub(crate) fn with_classes(tag: &str, classes: &[&str]) -> Self {
            let el = Self::new(tag);
            for class in classes {
                el.add_class(class);
            }
            el
        }

        pub(crate) fn style(&self, property: &str) -> Option<String> {
            self.0.borrow().styles.get(property).cloned()
        }

        pub(crate) fn text(&self) -> String {
            self.0.borrow().text.clone()
        }

        pub(crate) fn is_removed(&self) -> bool {
            self.0.borrow().removed
        }

        pub(crate) fn children(&self) -> Vec<FakeElement> {
            self.0.borrow().children.clone()
        }

        pub(crate) fn set_height(&self, height: f64) {
            self.0.borrow_mut().height = height;
        }

        fn matches(&self, selector: &str) -> bool {
            match selector.strip_prefix('.') {
                Some(class) => self.has_class(class),
                None => self.0.borrow().tag == selector,
            }
        }
    }

    impl Element for FakeElement {
        fn has_class(&self, class: &str) -> bool {
            self.0.borrow().classes.iter().any(|c| c == class)
        }

        fn add_class(&self, class: &str) {
            if !self.has_class(class) {
                self.0.borrow_mut().classes.push(class.to_owned());
            }
        }

        fn remove_class(&self, class: &str) {
            self.0.borrow_mut().classes.retain(|c| c != class);
        }

        fn attribute(&self, name: &str) -> Option<String> {
            self.0.borrow().attributes.get(name).cloned()
        }

        fn set_attribute(&self, name: &str, value: &str) {
            self.0
                .borrow_mut()
                .attributes
                .insert(name.to_owned(), value.to_owned());
        }

        fn set_style(&self, property: &str, value: &str) {
            self.0
                .borrow_mut()
                .styles
                .insert(property.to_owned(), value.to_owned());
        }

        fn set_text(&self, text: &str) {
            self.0.borrow_mut().text = text.to_owned();
        }

        fn parent(&self) -> Option<Self> {
            self.0.borrow().parent.clone()
        }

        fn query(&self, selector: &str) -> Option<Self> {
            self.query_all(selector).into_iter().next()
        }

        fn query_all(&self, selector: &str) -> Vec<Self> {
            self.children()
                .into_iter()
                .filter(|child| child.matches(selector))
                .collect()
        }

        fn append_child(&self, child: &Self) {
            child.0.borrow_mut().parent = Some(self.clone());
            self.0.borrow_mut().children.push(child.clone());
        }

        fn remove(&self) {
            let parent = self.0.borrow_mut().parent.take();
            if let Some(parent) = parent {
                parent.0.borrow_mut().children.retain(|c| c != self);
            }
            self.0.borrow_mut().removed = true;
        }

        fn height(&self) -> f64 {
            self.0.borrow().height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Element;
    use super::fake::FakeElement;

    #[test]
    fn is_within_walks_inclusive_ancestors() {
        let list = FakeElement::with_classes("ul", &["menu"]);
        let item = FakeElement::new("li");
        let link = FakeElement::new("a");
        list.append_child(&item);
        item.append_child(&link);
        let other = FakeElement::new("button");

        assert!(link.is_within(&list));
        assert!(list.is_within(&list));
        assert!(!list.is_within(&link));
        assert!(!other.is_within(&list));
    }
}
