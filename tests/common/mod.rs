pub mod fixtures;

use docpath::NodeRef;
use docpath::xml::{XmlDocument, XmlNode};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Installs a test logger once; `RUST_LOG=docpath_core=trace` shows each stage.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn document() -> XmlDocument<'static> {
    init_logger();
    XmlDocument::parse(fixtures::DOCUMENT).expect("fixture document should parse")
}

/// The section named `name`.
pub fn section<'a>(doc: &'a XmlDocument<'_>, name: &str) -> XmlNode<'a> {
    doc.query(&format!("//section[@names == \"{}\"]", name))
        .expect("section lookup should compile")
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no section named {}", name))
}

/// The `names` attribute of every element node in `nodes`.
pub fn names<'a, I>(nodes: I) -> Vec<String>
where
    I: IntoIterator<Item = NodeRef<'a, XmlNode<'a>>>,
{
    nodes
        .into_iter()
        .filter_map(|node| node.as_node())
        .filter_map(|node| node.inner().attribute("names"))
        .map(str::to_string)
        .collect()
}
