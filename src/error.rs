use thiserror::Error;

/// Main error type for embeval
#[derive(Error, Debug)]
pub enum EmbevalError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Category test-set file errors
    #[error("Category file error: {0}")]
    CategoryFile(String),

    /// Word missing from the model vocabulary while OOV words are disallowed
    #[error("word {0} is not in vocabulary")]
    Vocab(String),

    /// Vector store errors (malformed vector file, dimension mismatch)
    #[error("Vector store error: {0}")]
    Vectors(String),

    /// Wikidata / SPARQL endpoint errors
    #[error("Wikidata error: {0}")]
    Wikidata(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using EmbevalError
pub type Result<T> = std::result::Result<T, EmbevalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EmbevalError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_vocab_error_names_the_word() {
        let err = EmbevalError::Vocab("zebra".to_string());
        assert_eq!(err.to_string(), "word zebra is not in vocabulary");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EmbevalError = io_err.into();
        assert!(matches!(err, EmbevalError::Io(_)));
    }
}
