use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a failure, as reported to hosts that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Parse,
    Render,
    Serialization,
    Config,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("non-square board: a {width}x{height} grid does not fit the marked edges")]
    BoardSizeConflict { width: usize, height: usize },

    #[error("board too large (max is {max})")]
    BoardTooLarge { size: u32, max: u32 },

    #[error("unknown symbol \"{symbol}\"")]
    UnknownSymbol { symbol: char },

    #[error("invalid style configuration: {message}")]
    InvalidStyle { message: String },

    #[error("cannot read style configuration {}: {source}", path.display())]
    StyleIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BoardSizeConflict { .. }
            | Error::BoardTooLarge { .. }
            | Error::UnknownSymbol { .. } => ErrorKind::Parse,
            Error::InvalidStyle { .. } | Error::StyleIo { .. } => ErrorKind::Config,
        }
    }
}
