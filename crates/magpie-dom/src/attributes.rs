//! Ordered attribute storage for elements.
//!
//! [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
//!
//! "An element has an associated attribute list." The list is ordered, and
//! the HTML parser drops later duplicates of a name, so insertion order is
//! preserved here rather than using a hash map.

/// A single name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name, already lowercased by the tokenizer.
    pub name: String,
    /// The attribute value (empty string when the attribute had no value).
    pub value: String,
}

/// An element's attribute list, in source order.
///
/// Lookup is linear; attribute lists are short in practice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    /// Create an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Attributes {
            entries: Vec::new(),
        }
    }

    /// Get the value of the attribute with the given name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Check whether an attribute with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append an attribute unless one with the same name already exists.
    ///
    /// Returns `false` when the name was a duplicate and the pair was dropped,
    /// matching the first-occurrence-wins rule the parser applies.
    pub fn insert_if_absent(&mut self, name: String, value: String) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.entries.push(Attribute { name, value });
        true
    }

    /// Iterate over the attributes in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    /// The number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            let _ = attrs.insert_if_absent(name, value);
        }
        attrs
    }
}
