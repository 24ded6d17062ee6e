//! Owned subtree of a single XML element.
//!
//! The streaming parser materializes one `<entry>` at a time into an
//! [`Element`]; the decoder addresses it by tag and attribute, never by
//! position. Names are stored without namespace prefixes.

/// One XML element with its attributes, direct text and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Value of the attribute `key`, if present.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children named `name`, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants reached by following `path` one level per step.
    ///
    /// `entry.find_all(&["comment", "subcellularLocation", "location"])`
    /// behaves like the XPath `./comment/subcellularLocation/location`.
    pub fn find_all<'a>(&'a self, path: &[&str]) -> Vec<&'a Element> {
        let mut current = vec![self];
        for step in path {
            current = current
                .into_iter()
                .flat_map(|e| e.children.iter().filter(move |c| c.name == *step))
                .collect();
        }
        current
    }

    /// First descendant reached by following `path`.
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((step, rest)) => self
                .children
                .iter()
                .filter(|c| c.name == *step)
                .find_map(|c| c.find(rest)),
        }
    }

    /// Trimmed text content; `None` for empty or whitespace-only text.
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Approximate heap footprint of the subtree in bytes.
    pub fn weight(&self) -> usize {
        self.name.len()
            + self.text.len()
            + self
                .attributes
                .iter()
                .map(|(k, v)| k.len() + v.len())
                .sum::<usize>()
            + self.children.iter().map(Element::weight).sum::<usize>()
    }
}

/// Text of an optional node, treating a missing node, empty text and
/// whitespace-only text alike as absent.
pub fn optional_text(element: Option<&Element>) -> Option<String> {
    element.and_then(Element::text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, text: &str) -> Element {
        Element {
            name: name.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Element {
        let mut location_a = Element::new("subcellularLocation");
        location_a.children.push(leaf("location", "Membrane"));
        location_a.children.push(leaf("location", "Cytoplasm"));

        let mut comment = Element::new("comment");
        comment.attributes.push(("type".into(), "subcellular location".into()));
        comment.children.push(location_a);

        let mut entry = Element::new("entry");
        entry.attributes.push(("dataset".into(), "Swiss-Prot".into()));
        entry.children.push(leaf("accession", "P50129"));
        entry.children.push(leaf("accession", "Q00001"));
        entry.children.push(comment);
        entry.children.push(leaf("name", "   "));
        entry
    }

    #[test]
    fn test_attr_and_child() {
        let entry = sample();
        assert_eq!(entry.attr("dataset"), Some("Swiss-Prot"));
        assert_eq!(entry.attr("missing"), None);
        assert_eq!(entry.child("accession").and_then(Element::text), Some("P50129"));
        assert_eq!(entry.children("accession").count(), 2);
    }

    #[test]
    fn test_find_all_follows_path() {
        let entry = sample();
        let locations: Vec<_> = entry
            .find_all(&["comment", "subcellularLocation", "location"])
            .into_iter()
            .filter_map(Element::text)
            .collect();
        assert_eq!(locations, vec!["Membrane", "Cytoplasm"]);
        assert!(entry.find(&["comment", "subcellularLocation", "nothing"]).is_none());
    }

    #[test]
    fn test_optional_text_treats_blank_as_absent() {
        let entry = sample();
        assert_eq!(optional_text(entry.child("name")), None);
        assert_eq!(optional_text(entry.child("nope")), None);
        assert_eq!(optional_text(entry.child("accession")), Some("P50129".to_string()));
    }
}
