//! JSON template writer and reader.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use mimic_stream::GestureTemplate;

use crate::domain::ExperimentName;
use crate::IoError;

/// One trained gesture in a templates file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Gesture name.
    pub name: String,
    /// Trained template.
    pub template: GestureTemplate,
}

/// Content of an `{experiment}_templates.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSet {
    /// Experiment that produced the templates.
    pub experiment: String,
    /// Trained gestures in training order.
    pub templates: Vec<TemplateEntry>,
}

/// Writes trained templates to `{experiment}_templates.json`.
///
/// Creates the output directory on construction if it does not exist.
pub struct TemplateWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl TemplateWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path the templates file is written to.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_templates.json", self.experiment.as_str()))
    }

    /// Write `templates` and return the file path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | A template cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(n = templates.len()))]
    pub fn write(&self, templates: Vec<TemplateEntry>) -> Result<PathBuf, IoError> {
        let path = self.path();
        let artifact = TemplateSet {
            experiment: self.experiment.as_str().to_owned(),
            templates,
        };

        let json = serde_json::to_string_pretty(&artifact)?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "templates written");
        Ok(path)
    }
}

/// Read a templates file written by [`TemplateWriter`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Malformed JSON, or a template with an empty or non-finite prototype |
/// | [`IoError::EmptyDataset`] | The file holds no templates |
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_templates(path: &Path) -> Result<TemplateSet, IoError> {
    let content = fs::read_to_string(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    let set: TemplateSet = serde_json::from_str(&content).map_err(|e| IoError::json(path, e))?;
    if set.templates.is_empty() {
        return Err(IoError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }
    info!(n_templates = set.templates.len(), "templates loaded");
    Ok(set)
}
