//! Read-only, randomly indexable sectioned results.

use std::ops::Index;
use std::sync::Arc;

/// A run of records sharing (or spanning) one section key.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<K, R> {
    id: K,
    elements: Vec<R>,
}

impl<K, R> Section<K, R> {
    pub(crate) fn new(id: K, elements: Vec<R>) -> Self {
        Self { id, elements }
    }

    /// The section key.
    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[R] {
        &self.elements
    }
}

impl<K, R> Index<usize> for Section<K, R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.elements[index]
    }
}

impl<'a, K, R> IntoIterator for &'a Section<K, R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// An immutable snapshot of sections in first-occurrence order.
///
/// Cloning is cheap: the section list is shared. A controller replaces its
/// snapshot as a whole, so a clone held by a reader never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionedResults<K, R> {
    sections: Arc<[Section<K, R>]>,
}

impl<K, R> SectionedResults<K, R> {
    pub fn new(sections: Vec<Section<K, R>>) -> Self {
        Self {
            sections: sections.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section<K, R>> {
        self.sections.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section<K, R>> {
        self.sections.iter()
    }

    /// Total number of elements across all sections.
    ///
    /// Overlapping spans count their shared records once per section.
    pub fn element_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Section keys in result order.
    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.sections.iter().map(Section::id)
    }

    /// Whether both snapshots share the same underlying section list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.sections, &other.sections)
    }
}

impl<K: PartialEq, R> SectionedResults<K, R> {
    /// The section whose key equals `id`.
    pub fn section(&self, id: &K) -> Option<&Section<K, R>> {
        self.sections.iter().find(|s| s.id() == id)
    }

    /// Position of the section whose key equals `id`.
    pub fn index_of(&self, id: &K) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id)
    }
}

impl<K, R> Default for SectionedResults<K, R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, R> Index<usize> for SectionedResults<K, R> {
    type Output = Section<K, R>;

    fn index(&self, index: usize) -> &Section<K, R> {
        &self.sections[index]
    }
}

impl<'a, K, R> IntoIterator for &'a SectionedResults<K, R> {
    type Item = &'a Section<K, R>;
    type IntoIter = std::slice::Iter<'a, Section<K, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
