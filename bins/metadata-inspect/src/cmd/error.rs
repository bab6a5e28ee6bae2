use stream_metadata::MetadataError;

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("{0}")]
    Config(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open input {path}: {source}")]
    Input { path: String, source: std::io::Error },

    #[error("line {line}: not valid UTF-8: {source}")]
    Encoding {
        line: usize,
        source: std::string::FromUtf8Error,
    },

    #[error("line {line}: {source}")]
    Record { line: usize, source: MetadataError },
}
