//! Property list (XML) reader.
//!
//! Builds a `PlistValue` tree from the XML with `roxmltree`, so the atlas
//! extractor can address fields by key instead of by position.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{PrepError, PrepResult};

/// One plist value. Dict entries keep document order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    Dict(Vec<(String, PlistValue)>),
    Array(Vec<PlistValue>),
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Data(String),
    Date(String),
}

impl PlistValue {
    /// Element name of this value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dict(_) => "dict",
            Self::Array(_) => "array",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Boolean(true) => "true",
            Self::Boolean(false) => "false",
            Self::Data(_) => "data",
            Self::Date(_) => "date",
        }
    }

    pub fn as_dict(&self) -> Option<&[(String, Self)]> {
        match self {
            Self::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// First entry named `key`, if this is a dict.
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Parses a plist document. The root must be `<plist>` holding exactly one
/// value element.
pub fn parse_plist(text: &str) -> PrepResult<PlistValue> {
    // Packer output carries the Apple DOCTYPE.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)
        .map_err(|e| PrepError::malformed("plist", e))?;

    let root = doc.root_element();
    if root.tag_name().name() != "plist" {
        return Err(PrepError::drift(
            "plist",
            format!("root element is <{}>, expected <plist>", root.tag_name().name()),
        ));
    }
    let mut values = elements(root, "plist")?;
    match (values.next(), values.next()) {
        (Some(value), None) => convert(value, "plist"),
        (None, _) => Err(PrepError::drift("plist", "no value under <plist>")),
        (Some(_), Some(_)) => Err(PrepError::drift("plist", "more than one value under <plist>")),
    }
}

/// Element children of `node`. Whitespace and comments are skipped; any
/// other text is drift.
fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    context: &str,
) -> PrepResult<impl Iterator<Item = Node<'a, 'input>>> {
    for child in node.children() {
        if child.is_text() && child.text().is_some_and(|t| !t.trim().is_empty()) {
            return Err(PrepError::drift(
                context,
                format!("stray text {:?}", child.text().unwrap_or_default().trim()),
            ));
        }
    }
    Ok(node.children().filter(Node::is_element))
}

fn convert(node: Node<'_, '_>, context: &str) -> PrepResult<PlistValue> {
    let text = || node.text().unwrap_or_default();
    let value = match node.tag_name().name() {
        "dict" => PlistValue::Dict(convert_dict(node, context)?),
        "array" => {
            let mut items = Vec::new();
            for (i, child) in elements(node, context)?.enumerate() {
                items.push(convert(child, &format!("{context}[{i}]"))?);
            }
            PlistValue::Array(items)
        }
        "string" => PlistValue::String(text().to_owned()),
        "integer" => PlistValue::Integer(
            text()
                .trim()
                .parse()
                .map_err(|e| PrepError::malformed("plist", format!("{context}: {e}")))?,
        ),
        "real" => PlistValue::Real(
            text()
                .trim()
                .parse()
                .map_err(|e| PrepError::malformed("plist", format!("{context}: {e}")))?,
        ),
        "true" => PlistValue::Boolean(true),
        "false" => PlistValue::Boolean(false),
        "data" => PlistValue::Data(text().split_whitespace().collect()),
        "date" => PlistValue::Date(text().trim().to_owned()),
        other => {
            return Err(PrepError::drift(
                context,
                format!("unknown element <{other}>"),
            ));
        }
    };
    Ok(value)
}

/// `<key>` elements alternate with value elements.
fn convert_dict(node: Node<'_, '_>, context: &str) -> PrepResult<Vec<(String, PlistValue)>> {
    let mut entries = Vec::new();
    let mut children = elements(node, context)?;
    while let Some(key) = children.next() {
        if key.tag_name().name() != "key" {
            return Err(PrepError::drift(
                context,
                format!("expected <key>, found <{}>", key.tag_name().name()),
            ));
        }
        let name = key.text().unwrap_or_default().to_owned();
        let entry_context = format!("{context}.{name}");
        let Some(value) = children.next() else {
            return Err(PrepError::drift(entry_context, "key without a value"));
        };
        if value.tag_name().name() == "key" {
            return Err(PrepError::drift(entry_context, "key without a value"));
        }
        entries.push((name, convert(value, &entry_context)?));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::{PlistValue, parse_plist};
    use crate::error::PrepError;

    const HEADER: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "\n",
        r#"<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">"#,
        "\n",
    );

    fn doc(body: &str) -> String {
        format!("{HEADER}<plist version=\"1.0\">{body}</plist>")
    }

    #[test]
    fn scalars_and_nesting() {
        let value = parse_plist(&doc(
            "<dict>
                <key>name</key><string>a.png</string>
                <key>count</key><integer> 3 </integer>
                <key>scale</key><real>0.5</real>
                <key>rotated</key><false/>
                <key>list</key><array><true/><string>x</string></array>
             </dict>",
        ))
        .expect("parse");

        assert_eq!(value.get("name").and_then(PlistValue::as_str), Some("a.png"));
        assert_eq!(value.get("count"), Some(&PlistValue::Integer(3)));
        assert_eq!(value.get("scale"), Some(&PlistValue::Real(0.5)));
        assert_eq!(value.get("rotated").and_then(PlistValue::as_bool), Some(false));
        assert_eq!(
            value.get("list"),
            Some(&PlistValue::Array(vec![
                PlistValue::Boolean(true),
                PlistValue::String("x".to_owned())
            ]))
        );
    }

    #[test]
    fn dict_keeps_document_order() {
        let value = parse_plist(&doc(
            "<dict><key>z</key><string/><key>a</key><string/><key>m</key><string/></dict>",
        ))
        .expect("parse");
        let keys: Vec<_> = value
            .as_dict()
            .expect("dict")
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn empty_string_element() {
        let value = parse_plist(&doc("<string/>")).expect("parse");
        assert_eq!(value, PlistValue::String(String::new()));
    }

    #[test]
    fn escaped_text_is_decoded() {
        let value = parse_plist(&doc("<string>a &amp; b</string>")).expect("parse");
        assert_eq!(value.as_str(), Some("a & b"));
    }

    #[test]
    fn invalid_xml_is_malformed() {
        let err = parse_plist("<plist><dict></plist>").unwrap_err();
        assert!(matches!(err, PrepError::MalformedDocument { .. }));
    }

    #[test]
    fn wrong_root_is_drift() {
        let err = parse_plist("<dict></dict>").unwrap_err();
        assert!(matches!(err, PrepError::FormatDrift { .. }));
    }

    #[test]
    fn key_without_value_is_drift() {
        let err = parse_plist(&doc("<dict><key>a</key><key>b</key><string/></dict>")).unwrap_err();
        assert!(matches!(err, PrepError::FormatDrift { ref context, .. } if context == "plist.a"));

        let err = parse_plist(&doc("<dict><key>a</key></dict>")).unwrap_err();
        assert!(matches!(err, PrepError::FormatDrift { .. }));
    }

    #[test]
    fn value_without_key_is_drift() {
        let err = parse_plist(&doc("<dict><string>x</string></dict>")).unwrap_err();
        assert!(matches!(err, PrepError::FormatDrift { .. }));
    }

    #[test]
    fn unknown_element_is_drift() {
        let err = parse_plist(&doc("<dict><key>a</key><frame/></dict>")).unwrap_err();
        assert!(matches!(err, PrepError::FormatDrift { ref message, .. } if message.contains("frame")));
    }

    #[test]
    fn stray_text_is_drift() {
        let err = parse_plist(&doc("<dict>oops<key>a</key><string/></dict>")).unwrap_err();
        assert!(matches!(err, PrepError::FormatDrift { .. }));
    }

    #[test]
    fn bad_integer_is_malformed() {
        let err = parse_plist(&doc("<integer>ten</integer>")).unwrap_err();
        assert!(matches!(err, PrepError::MalformedDocument { .. }));
    }
}
