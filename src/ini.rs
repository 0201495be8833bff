//! Comment-preserving model of the AWS shared credentials file.
//!
//! The file is a flat sequence of `[section]` headers, `key = value` lines,
//! `#` comments and blank lines. Comments and blank lines are kept attached to
//! the header or key that follows them, so a parsed [`Document`] can be
//! written back with its layout intact after a targeted [`Document::set_value`].
//!
//! ```
//! use mfa_rs::ini::{parse, serialize};
//!
//! let mut doc = parse("[default]\naws_access_key_id = AAA\n").unwrap();
//! doc.set_value("mfa", "aws_access_key_id", "CCC");
//! assert_eq!(
//!     serialize(&doc),
//!     "[default]\naws_access_key_id = AAA\n\n[mfa]\naws_access_key_id = CCC\n"
//! );
//! ```

mod document;
mod error;
mod parser;
mod writer;

pub use document::{Document, Entry, Section};
pub use error::{FormatError, FormatErrorKind};
pub use parser::parse;
pub use writer::{serialize, write_document};
