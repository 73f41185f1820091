//! @ai:module:intent Analysis document model produced by the static analyzer
//! @ai:module:layer domain
//! @ai:module:public_api AnalysisDocument, FileDetail, ExportedFunction, FunctionCall, ProjectSignatures
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// @ai:intent Per-project analysis: one entry per analyzed source file
pub type AnalysisDocument = Vec<FileDetail>;

/// @ai:intent Exported functions found in one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    pub file_path: String,
    #[serde(default)]
    pub exported_functions: Vec<ExportedFunction>,
}

/// @ai:intent An exported function with its full source and declared call sites
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFunction {
    pub signature: String,
    pub text: String,
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
}

/// @ai:intent A call site declared by the analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    /// Exact call text as it appears in the function body
    pub text: String,
    #[serde(default)]
    pub function_name: String,
    #[serde(default)]
    pub function_source: String,
}

impl FunctionCall {
    /// @ai:intent Callee identifier: the call text up to its first `(`
    /// @ai:effects pure
    pub fn callee(&self) -> Option<&str> {
        self.text.find('(').map(|pos| &self.text[..pos])
    }
}

/// @ai:intent Exported signatures of one project and the bare identifiers they expose
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSignatures {
    pub signatures: BTreeSet<String>,
    pub identifiers: BTreeSet<String>,
}

impl ProjectSignatures {
    /// @ai:intent Collect deduplicated signatures across every file of a project
    /// @ai:effects pure
    pub fn from_document(document: &[FileDetail]) -> Self {
        let signatures: BTreeSet<String> = document
            .iter()
            .flat_map(|file| file.exported_functions.iter())
            .map(|function| function.signature.clone())
            .collect();

        let identifiers = signatures
            .iter()
            .filter_map(|signature| signature.find('(').map(|pos| signature[..pos].to_string()))
            .collect();

        Self {
            signatures,
            identifiers,
        }
    }

    /// @ai:intent Whether a callee is one of the project's own exported functions
    /// @ai:effects pure
    pub fn exposes(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    /// @ai:intent Signatures in their stable order
    /// @ai:effects pure
    pub fn to_vec(&self) -> Vec<String> {
        self.signatures.iter().cloned().collect()
    }
}
