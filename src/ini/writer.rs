use std::{fmt, io};

use super::document::Document;

/// Renders `doc` back to credentials-file text.
///
/// Every line ends with `\n` and keys are written as `key = value`. A section
/// added through [`Document::set_value`] gets a blank line in front of it so
/// it stays visually apart from the one before.
#[must_use]
pub fn serialize(doc: &Document) -> String {
    doc.to_string()
}

pub fn write_document<W: io::Write>(doc: &Document, mut writer: W) -> io::Result<()> {
    writer.write_all(serialize(doc).as_bytes())?;
    writer.flush()
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = false;

        for (name, section) in self.sections() {
            if written && section.is_created() && section.comments().is_empty() {
                writeln!(f)?;
            }

            for comment in section.comments() {
                writeln!(f, "{comment}")?;
            }
            writeln!(f, "[{name}]")?;
            written = true;

            for (key, entry) in section.entries() {
                for comment in entry.comments() {
                    writeln!(f, "{comment}")?;
                }
                writeln!(f, "{key} = {value}", value = entry.value())?;
            }
        }
        Ok(())
    }
}
