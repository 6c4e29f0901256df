use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis pass already completed; build a new analyzer to re-run")]
    AlreadyRun,

    #[error("failed to write export file {path}: {source}")]
    ExportIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
