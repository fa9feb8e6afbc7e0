use super::render::RenderError;

/// Errors reported by [`VirtualList`](super::VirtualList).
#[derive(Debug, thiserror::Error)]
pub enum VirtualListError {
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("render callback failed for item {index}: {source}")]
    RenderFailure {
        index: usize,
        #[source]
        source: RenderError,
    },

    #[error("invalid list configuration: {0}")]
    InvalidConfig(String),
}
