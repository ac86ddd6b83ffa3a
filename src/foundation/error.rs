/// Convenience result type used across promo-canvas.
pub type PromoResult<T> = Result<T, PromoError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`PromoError::Assembly`] is allowed to escape a full prototype build; every other
/// variant is absorbed at a module or asset boundary and turned into a visible placeholder.
#[derive(thiserror::Error, Debug)]
pub enum PromoError {
    /// Invalid user-provided configuration or profile data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The host refused to create an image node.
    #[error("asset creation error: {0}")]
    AssetCreation(String),

    /// No slicing response arrived within the configured bound.
    #[error("slicing timeout: {0}")]
    SlicingTimeout(String),

    /// The rasterization collaborator reported a failure.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// Not a single tile of an oversized image could be placed.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// A module builder failed internally.
    #[error("module build error: {0}")]
    ModuleBuild(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromoError {
    /// Build a [`PromoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PromoError::AssetCreation`] value.
    pub fn asset_creation(msg: impl Into<String>) -> Self {
        Self::AssetCreation(msg.into())
    }

    /// Build a [`PromoError::SlicingTimeout`] value.
    pub fn slicing_timeout(msg: impl Into<String>) -> Self {
        Self::SlicingTimeout(msg.into())
    }

    /// Build a [`PromoError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`PromoError::Assembly`] value.
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }

    /// Build a [`PromoError::ModuleBuild`] value.
    pub fn module_build(msg: impl Into<String>) -> Self {
        Self::ModuleBuild(msg.into())
    }

    /// Build a [`PromoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error must be surfaced to the caller of a full build.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Assembly(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
