//! Suite file loader
//!
//! Load one suite file, or every `.yaml`/`.yml` suite in a directory.

use std::collections::HashSet;
use std::path::Path;

use super::TestSuite;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Duplicate test case '{case}' in {file}")]
    DuplicateCase { file: String, case: String },
}

pub struct SuiteLoader;

impl SuiteLoader {
    /// Suites are returned in file name order
    pub fn load_directory(dir: &Path) -> Result<Vec<TestSuite>, LoadError> {
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if path.is_file() && matches!(ext, Some("yaml") | Some("yml")) {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| Self::load_file(path)).collect()
    }

    pub fn load_file(path: &Path) -> Result<TestSuite, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let suite: TestSuite = serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            file: path.display().to_string(),
            error: e,
        })?;

        let mut seen = HashSet::new();
        for case in &suite.cases {
            if !seen.insert(case.name.as_str()) {
                return Err(LoadError::DuplicateCase {
                    file: path.display().to_string(),
                    case: case.name.clone(),
                });
            }
        }

        Ok(suite)
    }

    /// Load a single file, or every suite under a directory
    pub fn load_path(path: &Path) -> Result<Vec<TestSuite>, LoadError> {
        if path.is_dir() {
            Self::load_directory(path)
        } else {
            Ok(vec![Self::load_file(path)?])
        }
    }
}
