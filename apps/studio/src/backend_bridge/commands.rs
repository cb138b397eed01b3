//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::GenerationRequest;

pub enum BackendCommand {
    Generate(GenerationRequest),
    Download { data_uri: String, dir: PathBuf },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Generate(_) => "generate",
            BackendCommand::Download { .. } => "download",
        }
    }
}
