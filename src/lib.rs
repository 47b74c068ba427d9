//! # docpath
//!
//! XPath-style path queries over ordered, attributed document trees.
//!
//! The engine lives in [`docpath_core`]; with the default `xml` feature,
//! [`xml`] adds `roxmltree`-backed documents.
//!
//! ```
//! # #[cfg(feature = "xml")]
//! # {
//! use docpath::xml::XmlDocument;
//!
//! let doc = XmlDocument::parse("<document><section><title>A</title></section></document>").unwrap();
//! let titles = doc.query("//section/title").unwrap();
//! assert_eq!(titles.len(), 1);
//! # }
//! ```

pub use docpath_core::*;

#[cfg(feature = "xml")]
pub use docpath_xml as xml;
