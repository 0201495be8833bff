use indexmap::IndexMap;

/// An ordered set of named sections.
///
/// Section order is the order headers appeared in the source, followed by
/// sections created through [`Document::set_value`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: IndexMap<String, Section>,
}

/// A named group of keys together with the comment lines above its header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    comments: Vec<String>,
    entries: IndexMap<String, Entry>,
    // Set for sections that did not come from parsed text.
    created: bool,
}

/// A value and the comment lines directly above its key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    value: String,
    comments: Vec<String>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Value of `key` in `section`, if both exist.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, s)| (name.as_str(), s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sets `key` in `section` to `value`, creating whichever is missing.
    ///
    /// New sections go to the end of the document and new keys to the end of
    /// their section. An existing key keeps its position and comments.
    ///
    /// Names are written out as-is, so the result only parses back when
    /// `section` is a single line and `key` is a non-empty single line without
    /// `=` that does not start with `#` or `[`.
    pub fn set_value(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_insert_with(|| Section {
                created: true,
                ..Section::default()
            })
            .set(key, value);
    }

    /// Appends a parsed section. Returns `false` if the name is taken.
    pub(crate) fn push_section(&mut self, name: &str, comments: Vec<String>) -> bool {
        if self.sections.contains_key(name) {
            return false;
        }
        self.sections.insert(
            name.to_string(),
            Section {
                comments,
                ..Section::default()
            },
        );
        true
    }

    pub(crate) fn last_section_mut(&mut self) -> Option<&mut Section> {
        self.sections.last_mut().map(|(_, s)| s)
    }
}

impl Section {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(Entry::value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, e)| (key.as_str(), e))
    }

    /// Comment and blank lines that preceded the section header.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.get_mut(key) {
            Some(entry) => entry.value = value,
            None => {
                self.entries.insert(
                    key.to_string(),
                    Entry {
                        value,
                        comments: Vec::new(),
                    },
                );
            }
        }
    }

    pub(crate) fn is_created(&self) -> bool {
        self.created
    }

    /// Appends a parsed key. Returns `false` if the key is taken.
    pub(crate) fn push_entry(&mut self, key: &str, value: &str, comments: Vec<String>) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                comments,
            },
        );
        true
    }
}

impl Entry {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Document {
        let mut doc = Document::new();
        assert!(doc.push_section("p", vec!["# profile".to_string()]));
        let section = doc.last_section_mut().unwrap();
        assert!(section.push_entry("a", "1", vec![]));
        assert!(section.push_entry("b", "2", vec!["# about b".to_string()]));
        assert!(section.push_entry("c", "3", vec![]));
        doc
    }

    #[test]
    fn overwrite_keeps_position_and_comments() {
        let mut doc = profile();
        doc.set_value("p", "b", "X");

        let section = doc.section("p").unwrap();
        assert_eq!(section.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(section.get("b"), Some("X"));
        let (_, b) = section.entries().nth(1).unwrap();
        assert_eq!(b.comments(), ["# about b"]);
        assert!(!section.is_created());
    }

    #[test]
    fn creates_missing_section_at_end() {
        let mut doc = profile();
        doc.set_value("new", "k", "v");

        let names: Vec<_> = doc.sections().map(|(name, _)| name).collect();
        assert_eq!(names, ["p", "new"]);
        let created = doc.section("new").unwrap();
        assert!(created.is_created());
        assert!(created.comments().is_empty());
        assert_eq!(doc.get("new", "k"), Some("v"));
        assert_eq!(doc.section("p"), profile().section("p"));
    }

    #[test]
    fn appends_missing_key() {
        let mut doc = profile();
        doc.set_value("p", "d", "");
        let section = doc.section("p").unwrap();
        assert_eq!(section.keys().last(), Some("d"));
        assert_eq!(section.get("d"), Some(""));
        assert_eq!(section.len(), 4);
    }

    #[test]
    fn set_value_is_idempotent() {
        let mut once = profile();
        once.set_value("mfa", "aws_session_token", "EEE");
        let mut twice = once.clone();
        twice.set_value("mfa", "aws_session_token", "EEE");
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_duplicates() {
        let mut doc = profile();
        assert!(!doc.push_section("p", vec![]));
        assert!(!doc.last_section_mut().unwrap().push_entry("a", "9", vec![]));
        assert_eq!(doc.get("p", "a"), Some("1"));
    }
}
