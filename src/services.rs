//! Compilation and deployment collaborators
//!
//! The generator only produces text. Turning it into bytecode and putting it
//! on a chain belongs to backends behind these traits; this crate ships no
//! implementation of either.

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::codegen::{Generator, RunConfig};
use crate::workspace::Workspace;

/// Source handed to a compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub source_text: String,
    /// Contract to extract from the compiled unit
    pub entry_name: String,
}

/// What a compiler reports back
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<serde_json::Value>,
    /// Hex encoded creation bytecode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl CompileOutcome {
    pub fn failed(errors: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: Some(errors.into()),
            ..Self::default()
        }
    }
}

/// Input for a deployment backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub abi: serde_json::Value,
    pub bytecode: String,
    #[serde(default)]
    pub constructor_args: Vec<serde_json::Value>,
    pub network_id: String,
}

/// Deployment result: either done on chain or left for an external signer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeployOutcome {
    #[serde(rename_all = "camelCase")]
    Broadcast {
        address: String,
        transaction_hash: String,
    },
    #[serde(rename_all = "camelCase")]
    Unsigned {
        /// Transaction fields for the signer, opaque to this crate
        transaction: serde_json::Value,
    },
}

/// Collaborator failures; their content is opaque to the generator
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Compilation service unavailable: {0}")]
    Unavailable(String),

    #[error("Deployment failed: {0}")]
    Deployment(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait CompilationService: Send + Sync {
    async fn compile(&self, request: CompileRequest) -> Result<CompileOutcome, ServiceError>;
}

#[async_trait]
pub trait DeploymentService: Send + Sync {
    async fn deploy(&self, request: DeployRequest) -> Result<DeployOutcome, ServiceError>;
}

/// Generate the workspace with the given settings and hand the text to a
/// compiler. Imports in `config` are consumed as with any generation.
pub async fn generate_and_compile<C>(
    generator: &Generator,
    workspace: &Workspace,
    config: &mut RunConfig,
    entry_name: &str,
    compiler: &C,
) -> Result<CompileOutcome, ServiceError>
where
    C: CompilationService + ?Sized,
{
    let source_text = generator.generate_with(workspace, config);
    debug!("compiling {} bytes as '{}'", source_text.len(), entry_name);
    let outcome = compiler
        .compile(CompileRequest {
            source_text,
            entry_name: entry_name.to_string(),
        })
        .await?;
    if !outcome.success {
        warn!(
            "compilation of '{}' failed: {}",
            entry_name,
            outcome.errors.as_deref().unwrap_or("no details")
        );
    }
    Ok(outcome)
}
