//! @ai:module:intent Load per-project analysis documents from a directory
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalysisLoader, AnalysisLoaderTrait, ProjectAnalysis, LoadedAnalyses
//! @ai:module:stateless true

use crate::corpus::analysis::{AnalysisDocument, ProjectSignatures};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent One successfully parsed project
#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    /// File name of the analysis document, used as the project's sort key
    pub name: String,
    pub document: AnalysisDocument,
    pub signatures: ProjectSignatures,
}

/// @ai:intent Outcome of loading a directory of analysis documents
#[derive(Debug, Default)]
pub struct LoadedAnalyses {
    pub found: usize,
    pub skipped: Vec<PathBuf>,
    pub projects: Vec<ProjectAnalysis>,
}

/// @ai:intent Trait for loading analysis documents
pub trait AnalysisLoaderTrait: Send + Sync {
    /// @ai:intent Load every analysis document in a directory, ordered by file name
    fn load_all(&self, analysis_dir: &Path) -> Result<LoadedAnalyses>;
}

/// @ai:intent Loads analyzer output (`*.json`, one per project)
pub struct AnalysisLoader;

impl AnalysisLoader {
    /// @ai:intent Create a new analysis loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse a single analysis document
    /// @ai:effects fs:read
    pub fn parse_document(path: &Path) -> Result<AnalysisDocument> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| Error::MalformedInput {
            path: path.to_path_buf(),
            source,
        })
    }

    /// @ai:intent Find the JSON documents directly inside the directory, sorted by name
    /// @ai:effects fs:read
    fn find_analysis_files(analysis_dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(analysis_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files
    }
}

impl Default for AnalysisLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisLoaderTrait for AnalysisLoader {
    /// @ai:intent Load all documents, skipping malformed ones
    /// @ai:effects fs:read
    fn load_all(&self, analysis_dir: &Path) -> Result<LoadedAnalyses> {
        if !analysis_dir.is_dir() {
            return Err(Error::config(format!(
                "Analysis directory {} does not exist",
                analysis_dir.display()
            )));
        }

        let files = Self::find_analysis_files(analysis_dir);
        tracing::info!("Found {} analysis files", files.len());

        let mut loaded = LoadedAnalyses {
            found: files.len(),
            ..Default::default()
        };

        for path in files {
            match Self::parse_document(&path) {
                Ok(document) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let signatures = ProjectSignatures::from_document(&document);

                    loaded.projects.push(ProjectAnalysis {
                        name,
                        document,
                        signatures,
                    });
                }
                Err(e @ Error::MalformedInput { .. }) => {
                    tracing::warn!("Skipping malformed analysis document: {}", e);
                    loaded.skipped.push(path);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(loaded)
    }
}
