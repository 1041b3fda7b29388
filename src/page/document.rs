//! Elements, class lists and the document that owns them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::page::selector::Selector;

/// Ordered set of class names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Add each name not already present, preserving insertion order.
    pub fn add<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            if !self.contains(name) {
                self.names.push(name.to_string());
            }
        }
    }

    pub fn remove<S: AsRef<str>>(&mut self, names: &[S]) {
        self.names
            .retain(|n| !names.iter().any(|r| r.as_ref() == n));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(" "))
    }
}

/// A single page element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: ClassList,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            classes: ClassList::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_classes<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.classes.add(names);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Read a `data-*` attribute by its suffix, e.g. `heartbeat-url`.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attribute(&format!("data-{}", key))
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassList {
        &mut self.classes
    }
}

/// The status page: a body element plus a flat list of content elements.
#[derive(Debug, Clone)]
pub struct Document {
    body: Element,
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
            elements: Vec::new(),
        }
    }

    pub fn with_body(body: Element) -> Self {
        Self {
            body,
            elements: Vec::new(),
        }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn append(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// First element matching the selector, in document order.
    pub fn query_selector(&self, selector: &Selector) -> Option<&Element> {
        std::iter::once(&self.body)
            .chain(self.elements.iter())
            .find(|e| selector.matches(e))
    }

    pub fn query_selector_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        std::iter::once(&mut self.body)
            .chain(self.elements.iter_mut())
            .find(|e| selector.matches(e))
    }

    /// Remove every non-body element matching the selector.
    pub fn remove_matching(&mut self, selector: &Selector) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !selector.matches(e));
        before - self.elements.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A document shared between the monitor and whoever renders it.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    inner: Arc<RwLock<Document>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    // A panicking writer cannot leave a class list half-updated, so a
    // poisoned lock is still safe to use.
    pub fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Document> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
