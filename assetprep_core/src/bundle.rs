//! Combined data bundle: the font metrics and texture atlas documents
//! nested under fixed keys in one file for the renderer.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PrepResult;
use crate::fsio::{self, JsonStyle};

/// `{"font": ..., "textures": ...}`. Both values are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBundle {
    pub font: Value,
    pub textures: Value,
}

pub fn merge_bundle(font: Value, textures: Value) -> DataBundle {
    DataBundle { font, textures }
}

/// Reads both documents, merges them, and replaces `output`.
///
/// Nothing is written unless both inputs decode.
pub fn merge_files(
    font: &Path,
    textures: &Path,
    output: &Path,
    style: JsonStyle,
) -> PrepResult<DataBundle> {
    let font_doc: Value = fsio::read_json(font)?;
    let textures_doc: Value = fsio::read_json(textures)?;
    let bundle = merge_bundle(font_doc, textures_doc);
    fsio::write_json(output, &bundle, style)?;
    log::info!(
        "bundle: merged {} and {} into {}",
        font.display(),
        textures.display(),
        output.display()
    );
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::{Value, json};

    use super::{merge_bundle, merge_files};
    use crate::error::PrepError;
    use crate::fsio::JsonStyle;
    use crate::test_util::TestDir;

    #[test]
    fn bundle_serializes_under_fixed_keys() {
        let bundle = merge_bundle(json!({"chars": []}), json!({"images": []}));
        let value = serde_json::to_value(&bundle).expect("serialize");
        assert_eq!(value, json!({"font": {"chars": []}, "textures": {"images": []}}));
    }

    #[test]
    fn non_object_inputs_are_kept_verbatim() {
        let bundle = merge_bundle(json!([1, 2]), json!("text"));
        let value = serde_json::to_value(&bundle).expect("serialize");
        assert_eq!(value, json!({"font": [1, 2], "textures": "text"}));
    }

    #[test]
    fn merge_files_writes_combined_document() {
        let dir = TestDir::new("bundle_merge");
        let font = dir.path.join("font.json");
        let textures = dir.path.join("textures.json");
        let output = dir.path.join("data.json");
        let font_doc = json!({"info": {"face": "Ubuntu"}, "chars": [{"char": "é", "id": 233}]});
        let textures_doc = json!({"images": [], "metadata": {"size": [64, 64]}});
        fs::write(&font, font_doc.to_string()).expect("seed font");
        fs::write(&textures, textures_doc.to_string()).expect("seed textures");

        merge_files(&font, &textures, &output, JsonStyle::default()).expect("merge");

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&output).expect("read")).expect("parse");
        assert_eq!(written, json!({"font": font_doc, "textures": textures_doc}));
    }

    #[test]
    fn malformed_input_writes_nothing() {
        let dir = TestDir::new("bundle_malformed");
        let font = dir.path.join("font.json");
        let textures = dir.path.join("textures.json");
        let output = dir.path.join("data.json");
        fs::write(&font, "{}").expect("seed font");
        fs::write(&textures, "[1, 2").expect("seed textures");

        let err = merge_files(&font, &textures, &output, JsonStyle::default()).unwrap_err();
        assert!(matches!(err, PrepError::MalformedDocument { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_is_file_not_found() {
        let dir = TestDir::new("bundle_missing");
        let output = dir.path.join("data.json");
        fs::write(&output, "old").expect("seed output");

        let err = merge_files(
            &dir.path.join("font.json"),
            &dir.path.join("textures.json"),
            &output,
            JsonStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PrepError::FileNotFound { .. }));
        assert_eq!(fs::read_to_string(&output).expect("read"), "old");
    }
}
