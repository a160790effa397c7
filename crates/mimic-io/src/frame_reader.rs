//! CSV frame stream reader with full input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use mimic_dtw::Frame;

use crate::IoError;

/// Reads a recorded motion stream from a CSV file.
///
/// Expected CSV format:
/// - Header row `x,y,z` (case-insensitive)
/// - One frame per row, three finite values
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::InvalidHeader`] | Header is not `x,y,z` |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row does not have three columns |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct FrameReader {
    path: PathBuf,
}

impl FrameReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning the frames in file order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<Frame>, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so the row length check below reports the row.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let is_xyz = header.len() == 3
            && header
                .iter()
                .zip(["x", "y", "z"])
                .all(|(got, want)| got.eq_ignore_ascii_case(want));
        if !is_xyz {
            return Err(IoError::InvalidHeader {
                path: self.path.clone(),
                found: header.iter().collect::<Vec<_>>().join(","),
            });
        }
        debug!("read CSV header");

        let mut frames = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != 3 {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    got: record.len(),
                });
            }

            let mut axes = [0.0; 3];
            for (col_index, (raw, axis)) in record.iter().zip(axes.iter_mut()).enumerate() {
                *axis = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
            }
            frames.push(Frame::from(axes));
        }

        if frames.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_frames = frames.len(), "frame stream loaded");
        Ok(frames)
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_stream() {
        let f = write_csv("x,y,z\n0.0,9.8,0.1\n1.5,-2.0,3.25\n");
        let frames = FrameReader::new(f.path()).read().unwrap();
        assert_eq!(
            frames,
            vec![Frame::new(0.0, 9.8, 0.1), Frame::new(1.5, -2.0, 3.25)]
        );
    }

    #[test]
    fn header_is_case_insensitive_and_trimmed() {
        let f = write_csv("X, Y, Z\n1, 2, 3\n");
        let frames = FrameReader::new(f.path()).read().unwrap();
        assert_eq!(frames, vec![Frame::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn error_file_not_found() {
        let result = FrameReader::new(Path::new("/nonexistent/frames.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_wrong_header() {
        let f = write_csv("t,x,y,z\n0,1,2,3\n");
        let result = FrameReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::InvalidHeader { found, .. }) if found == "t,x,y,z"));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("x,y,z\n");
        let result = FrameReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let f = write_csv("x,y,z\n1,2,3\n1,2\n");
        let result = FrameReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength { row_index: 1, got: 2, .. })
        ));
    }

    #[test]
    fn error_non_finite_nan() {
        let f = write_csv("x,y,z\n1,NaN,3\n");
        let result = FrameReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue { row_index: 0, col_index: 1, .. })
        ));
    }

    #[test]
    fn error_unparseable_value() {
        let f = write_csv("x,y,z\n1,2,abc\n");
        let result = FrameReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::NonFiniteValue { raw, .. }) if raw == "abc"));
    }
}
