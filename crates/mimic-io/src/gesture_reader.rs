//! JSON gesture set reader with crop validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use mimic_dtw::{DtwError, Frame, Sequence};

use crate::domain::{GestureData, GestureSet};
use crate::IoError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGesture {
    name: String,
    #[serde(default, alias = "labelNumber")]
    class_id: Option<u32>,
    #[serde(default, alias = "gestures")]
    samples: Vec<RawSample>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSample {
    #[serde(alias = "rawData", alias = "motion")]
    frames: Vec<Frame>,
    #[serde(default)]
    crop_start_index: Option<usize>,
    #[serde(default)]
    crop_end_index: Option<usize>,
}

/// Reads a recorded gesture set from a JSON file.
///
/// Expected layout:
///
/// ```json
/// [
///   {
///     "name": "wave",
///     "classId": 1,
///     "samples": [
///       { "frames": [{"x": 0.1, "y": 9.8, "z": 0.0}], "cropStartIndex": 0, "cropEndIndex": 0 }
///     ]
///   }
/// ]
/// ```
///
/// `labelNumber`, `gestures`, `rawData` and upper-case `X`/`Y`/`Z` are
/// accepted as aliases. Crop bounds are inclusive and default to the whole
/// recording. A missing `classId` defaults to the gesture position plus one.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Malformed JSON or unexpected layout |
/// | [`IoError::EmptyDataset`] | The file holds no gestures |
/// | [`IoError::DuplicateGesture`] | Two gestures share a name |
/// | [`IoError::InvalidCrop`] | Empty recording or crop outside the recording |
/// | [`IoError::NonFiniteValue`] | A cropped frame holds a non-finite value |
pub struct GestureReader {
    path: PathBuf,
}

impl GestureReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the gesture file, returning the cropped examples.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<GestureSet, IoError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let raw: Vec<RawGesture> =
            serde_json::from_str(&content).map_err(|e| IoError::json(&self.path, e))?;
        if raw.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let mut seen = HashSet::new();
        let mut gestures = Vec::with_capacity(raw.len());
        for (position, gesture) in raw.into_iter().enumerate() {
            if !seen.insert(gesture.name.clone()) {
                return Err(IoError::DuplicateGesture {
                    path: self.path.clone(),
                    name: gesture.name,
                });
            }
            let examples = gesture
                .samples
                .into_iter()
                .enumerate()
                .map(|(sample, s)| self.crop(&gesture.name, sample, s))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(name = %gesture.name, n_examples = examples.len(), "gesture parsed");

            let class_id = gesture
                .class_id
                .unwrap_or_else(|| u32::try_from(position + 1).unwrap_or(u32::MAX));
            gestures.push(GestureData {
                name: gesture.name,
                class_id,
                examples,
            });
        }

        let set = GestureSet::new(gestures);
        info!(
            n_gestures = set.len(),
            n_examples = set.n_examples(),
            "gesture set loaded"
        );
        Ok(set)
    }

    fn crop(&self, gesture: &str, sample: usize, raw: RawSample) -> Result<Sequence, IoError> {
        let len = raw.frames.len();
        let start = raw.crop_start_index.unwrap_or(0);
        let end = raw.crop_end_index.unwrap_or(len.saturating_sub(1));
        if len == 0 || start > end || end >= len {
            return Err(IoError::InvalidCrop {
                path: self.path.clone(),
                gesture: gesture.to_owned(),
                sample,
                start,
                end,
                len,
            });
        }

        let cropped = raw.frames[start..=end].to_vec();
        Sequence::new(cropped).map_err(|e| match e {
            DtwError::NonFiniteValue { index, axis } => IoError::NonFiniteValue {
                path: self.path.clone(),
                row_index: start + index,
                col_index: axis,
                raw: format!("{}", raw.frames[start + index].axes()[axis]),
            },
            DtwError::EmptySequence => IoError::EmptyDataset {
                path: self.path.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const FRAMES: &str = r#"[{"x":0,"y":0,"z":0},{"x":1,"y":0,"z":0},{"x":2,"y":0,"z":0},{"x":3,"y":0,"z":0}]"#;

    #[test]
    fn read_cropped_examples() {
        let json = format!(
            r#"[{{"name":"wave","classId":4,"samples":[
                {{"frames":{FRAMES},"cropStartIndex":1,"cropEndIndex":2}},
                {{"frames":{FRAMES}}}
            ]}}]"#
        );
        let f = write_json(&json);
        let set = GestureReader::new(f.path()).read().unwrap();
        assert_eq!(set.len(), 1);
        let wave = set.get("wave").unwrap();
        assert_eq!(wave.class_id, 4);
        assert_eq!(wave.examples.len(), 2);
        assert_eq!(
            wave.examples[0].as_slice(),
            &[Frame::new(1.0, 0.0, 0.0), Frame::new(2.0, 0.0, 0.0)]
        );
        assert_eq!(wave.examples[1].len(), 4);
    }

    #[test]
    fn accepts_legacy_field_names() {
        let json = r#"[{"name":"tap","labelNumber":9,"gestures":[
            {"rawData":[{"X":1.5,"Y":-2,"Z":9.8},{"X":1,"Y":0,"Z":0}],"cropStartIndex":0,"cropEndIndex":0}
        ]}]"#;
        let f = write_json(json);
        let set = GestureReader::new(f.path()).read().unwrap();
        let tap = set.get("tap").unwrap();
        assert_eq!(tap.class_id, 9);
        assert_eq!(tap.examples[0].as_slice(), &[Frame::new(1.5, -2.0, 9.8)]);
    }

    #[test]
    fn missing_class_id_uses_position() {
        let json = format!(
            r#"[{{"name":"a","samples":[]}},{{"name":"b","samples":[{{"frames":{FRAMES}}}]}}]"#
        );
        let f = write_json(&json);
        let set = GestureReader::new(f.path()).read().unwrap();
        assert_eq!(set.gestures()[0].class_id, 1);
        assert_eq!(set.gestures()[1].class_id, 2);
        assert!(set.gestures()[0].examples.is_empty());
    }

    #[test]
    fn error_file_not_found() {
        let result = GestureReader::new(Path::new("/nonexistent/gestures.json")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_malformed_json() {
        let f = write_json(r#"[{"name": "wave", "samples": [{"frames": "oops"}]}]"#);
        let result = GestureReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::JsonParse { line: 1, .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_json("[]");
        let result = GestureReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_crop_past_end() {
        let json = format!(
            r#"[{{"name":"wave","samples":[{{"frames":{FRAMES},"cropStartIndex":2,"cropEndIndex":4}}]}}]"#
        );
        let f = write_json(&json);
        let result = GestureReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::InvalidCrop { sample: 0, start: 2, end: 4, len: 4, .. })
        ));
    }

    #[test]
    fn error_crop_reversed() {
        let json = format!(
            r#"[{{"name":"wave","samples":[{{"frames":{FRAMES},"cropStartIndex":3,"cropEndIndex":1}}]}}]"#
        );
        let f = write_json(&json);
        let result = GestureReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::InvalidCrop { .. })));
    }

    #[test]
    fn error_empty_recording() {
        let f = write_json(r#"[{"name":"wave","samples":[{"frames":[]}]}]"#);
        let result = GestureReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::InvalidCrop { len: 0, .. })));
    }

    #[test]
    fn error_duplicate_gesture() {
        let f = write_json(r#"[{"name":"wave","samples":[]},{"name":"wave","samples":[]}]"#);
        let result = GestureReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::DuplicateGesture { name, .. }) if name == "wave"));
    }
}
