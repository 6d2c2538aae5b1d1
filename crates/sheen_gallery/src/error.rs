use sheen_style::StyleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("gallery catalog is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid gallery catalog: {0}")]
    Catalog(String),

    #[error("unknown widget kind `{0}`")]
    UnknownKind(String),

    #[error("variant {index} out of range for `{kind}` ({len} variants)")]
    VariantOutOfRange {
        kind: String,
        index: usize,
        len: usize,
    },

    #[error("checklist item {index} out of range ({len} items)")]
    ItemOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Style(#[from] StyleError),
}
