use thiserror::Error;

/// Result type for dexter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dexter operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure or non-success status from the upstream API
    #[error("Upstream error for {url}: {message}")]
    Upstream {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Response body did not match the expected JSON shape
    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    /// One entity's detail/species/chain fan-out failed
    #[error("Failed to join entity '{entity}': {source}")]
    Join {
        entity: String,
        #[source]
        source: Box<Error>,
    },

    /// Evolution graph exceeded the depth guard or is structurally invalid
    #[error("Malformed evolution chain: {0}")]
    MalformedChain(String),

    /// A catalog batch could not be loaded; nothing from it was merged
    #[error("Failed to load catalog batch at offset {offset}: {source}")]
    CatalogLoad {
        offset: usize,
        #[source]
        source: Box<Error>,
    },

    /// Lookup for an unknown entity name
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an upstream error
    pub fn upstream(url: impl Into<String>, status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            url: url.into(),
            status,
            message: msg.into(),
        }
    }

    /// Creates a parse error
    pub fn parse(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Wraps a failure of one entity's fan-out
    pub fn join(entity: impl Into<String>, source: Error) -> Self {
        Self::Join {
            entity: entity.into(),
            source: Box::new(source),
        }
    }

    /// Creates a malformed chain error
    pub fn malformed_chain(msg: impl Into<String>) -> Self {
        Self::MalformedChain(msg.into())
    }

    /// Wraps a batch-level failure
    pub fn catalog_load(offset: usize, source: Error) -> Self {
        Self::CatalogLoad {
            offset,
            source: Box::new(source),
        }
    }

    /// Creates a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True if the upstream answered 404
    pub fn is_upstream_not_found(&self) -> bool {
        matches!(
            self,
            Self::Upstream {
                status: Some(404),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_load_wraps_join_error() {
        let cause = Error::upstream("http://api/pokemon/1/", Some(500), "boom");
        let err = Error::catalog_load(100, Error::join("bulbasaur", cause));

        let message = err.to_string();
        assert!(message.contains("offset 100"));
        assert!(message.contains("bulbasaur"));
        assert!(matches!(err, Error::CatalogLoad { offset: 100, .. }));
    }

    #[test]
    fn test_is_upstream_not_found() {
        assert!(Error::upstream("u", Some(404), "missing").is_upstream_not_found());
        assert!(!Error::upstream("u", Some(500), "boom").is_upstream_not_found());
        assert!(!Error::upstream("u", None, "timeout").is_upstream_not_found());
        assert!(!Error::not_found("x").is_upstream_not_found());
    }
}
