use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(ErrorKind), derive(EnumString, Display, Hash))]
pub enum ResourceError {
    /// Malformed input, schema violation, unknown resource type or bad option.
    #[error("{0}")]
    BadParameter(String),

    /// An error annotated with call-site context. The kind of the original
    /// error is kept reachable through [`ResourceError::root`].
    #[error("{context}: {source}")]
    Wrapped {
        context: String,
        source: Box<ResourceError>,
    },

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl ResourceError {
    pub fn bad_parameter(message: impl Into<String>) -> Self {
        ResourceError::BadParameter(message.into())
    }

    /// Annotate the error with `context` without changing what it is.
    pub fn wrap(self, context: impl Into<String>) -> Self {
        ResourceError::Wrapped {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from(self)
    }

    /// The innermost error, skipping any `Wrapped` layers.
    pub fn root(&self) -> &ResourceError {
        let mut current = self;
        while let ResourceError::Wrapped { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn is_bad_parameter(&self) -> bool {
        matches!(self.root(), ResourceError::BadParameter(_))
    }
}
