use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("music directory has no playable tracks")]
    CatalogEmpty,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to open track {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode track {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("seek rejected by output: {0}")]
    Seek(String),

    #[error("no track bound")]
    NotBound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_error_names_the_track() {
        let err = EngineError::Open {
            path: PathBuf::from("a.mp3"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to open track a.mp3");
    }

    #[test]
    fn catalog_empty_is_terminal_for_setup() {
        let err = DeckError::CatalogEmpty;
        assert_eq!(err.to_string(), "music directory has no playable tracks");
    }
}
