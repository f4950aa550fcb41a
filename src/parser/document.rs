//! In-memory model for TCX documents.
//!
//! The tree keeps every element and text node in document order. Tag
//! local names are resolved once, at construction time, into
//! [`ElementKind`]; unknown elements are carried verbatim under
//! [`ElementKind::Other`] so the rest of the document round-trips
//! untouched.

/// The closed set of element identities the converter cares about.
///
/// Resolution ignores any namespace prefix, so `Speed` and `ns3:Speed`
/// map to the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Activity,
    Lap,
    Track,
    Trackpoint,
    Time,
    DistanceMeters,
    Value,
    Cadence,
    Speed,
    Watts,
    Resistance,
    Creator,
    Extensions,
    Tpx,
    /// Anything else, preserved verbatim
    Other,
}

impl ElementKind {
    /// Resolve a tag's local name (prefix already stripped)
    pub fn from_local_name(name: &str) -> Self {
        match name {
            "Activity" => Self::Activity,
            "Lap" => Self::Lap,
            "Track" => Self::Track,
            "Trackpoint" => Self::Trackpoint,
            "Time" => Self::Time,
            "DistanceMeters" => Self::DistanceMeters,
            "Value" => Self::Value,
            "Cadence" => Self::Cadence,
            "Speed" => Self::Speed,
            "Watts" => Self::Watts,
            "Resistance" => Self::Resistance,
            "Creator" => Self::Creator,
            "Extensions" => Self::Extensions,
            "TPX" => Self::Tpx,
            _ => Self::Other,
        }
    }
}

/// One node in the document tree
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element: resolved kind, serialized tag name (including any
/// namespace prefix), attributes, and ordered children
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element, resolving its kind from the local name
    pub fn new(name: &str) -> Self {
        Self {
            kind: resolve_kind(name),
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Rename the element, re-resolving its kind from the new local name
    pub fn rename(&mut self, name: &str) {
        self.kind = resolve_kind(name);
        self.name = name.to_string();
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value for the key
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute; returns whether it was present
    pub fn remove_attribute(&mut self, key: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| k != key);
        self.attributes.len() != before
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        })
    }

    /// First descendant of the given kind, in document order
    pub fn find(&self, kind: ElementKind) -> Option<&Element> {
        for child in self.child_elements() {
            if child.kind == kind {
                return Some(child);
            }
            if let Some(found) = child.find(kind) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable variant of [`Element::find`]
    pub fn find_mut(&mut self, kind: ElementKind) -> Option<&mut Element> {
        for child in self.child_elements_mut() {
            if child.kind == kind {
                return Some(child);
            }
            if let Some(found) = child.find_mut(kind) {
                return Some(found);
            }
        }
        None
    }

    /// Collect all descendants of the given kind, in document order.
    /// Matching elements are not searched for nested matches.
    pub fn collect<'a>(&'a self, kind: ElementKind, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.kind == kind {
                out.push(child);
            } else {
                child.collect(kind, out);
            }
        }
    }

    /// Mutable variant of [`Element::collect`]
    pub fn collect_mut<'a>(&'a mut self, kind: ElementKind, out: &mut Vec<&'a mut Element>) {
        for child in self.child_elements_mut() {
            if child.kind == kind {
                out.push(child);
            } else {
                child.collect_mut(kind, out);
            }
        }
    }

    /// Concatenated text content of this element's direct text children
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Text(text) => Some(text.as_str()),
            Node::Element(_) => None,
        })
    }

    /// Replace the element's content with a single text node
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        self.children.push(Node::Text(text.to_string()));
    }

    /// Pre-order walk over this element and all element descendants
    pub fn visit(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for child in self.child_elements() {
            child.visit(f);
        }
    }
}

/// A parsed TCX document. Whitespace-only text is dropped at parse time,
/// so serializing with indentation is idempotent.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Element,
}

fn resolve_kind(name: &str) -> ElementKind {
    let local = name.rsplit(':').next().unwrap_or(name);
    ElementKind::from_local_name(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_resolution_ignores_prefix() {
        assert_eq!(Element::new("TPX").kind, ElementKind::Tpx);
        assert_eq!(Element::new("ns3:TPX").kind, ElementKind::Tpx);
        assert_eq!(Element::new("ns3:Speed").kind, ElementKind::Speed);
        assert_eq!(Element::new("SomethingElse").kind, ElementKind::Other);
    }

    #[test]
    fn test_rename_reresolves_kind() {
        let mut elem = Element::new("Speed");
        elem.rename("ns3:Speed");
        assert_eq!(elem.kind, ElementKind::Speed);
        assert_eq!(elem.name, "ns3:Speed");
    }

    #[test]
    fn test_attributes() {
        let mut elem = Element::new("Lap");
        elem.set_attribute("StartTime", "2024-05-01T12:00:00Z");
        assert_eq!(elem.attribute("StartTime"), Some("2024-05-01T12:00:00Z"));

        elem.set_attribute("StartTime", "2024-05-01T13:00:00Z");
        assert_eq!(elem.attributes.len(), 1);
        assert_eq!(elem.attribute("StartTime"), Some("2024-05-01T13:00:00Z"));

        assert!(elem.remove_attribute("StartTime"));
        assert!(!elem.remove_attribute("StartTime"));
    }

    #[test]
    fn test_find_descends() {
        let mut track = Element::new("Track");
        let mut tp = Element::new("Trackpoint");
        let mut time = Element::new("Time");
        time.set_text("2024-05-01T12:00:00Z");
        tp.children.push(Node::Element(time));
        track.children.push(Node::Element(tp));

        let found = track.find(ElementKind::Time).unwrap();
        assert_eq!(found.text(), Some("2024-05-01T12:00:00Z"));
        assert!(track.find(ElementKind::Creator).is_none());
    }

    #[test]
    fn test_collect_does_not_nest_into_matches() {
        let mut root = Element::new("Activities");
        for _ in 0..2 {
            let mut lap = Element::new("Lap");
            lap.children.push(Node::Element(Element::new("Track")));
            root.children.push(Node::Element(lap));
        }

        let mut tracks = Vec::new();
        root.collect(ElementKind::Track, &mut tracks);
        assert_eq!(tracks.len(), 2);
    }
}
