// Resource lookup for the documents shipped alongside the input subsystem
//
// Locates `topology.xml`, `buttonmap.xml` and friends inside the add-on's
// resource directory.

mod loader;

pub use loader::ResourceLoader;

/// Resource loading errors
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
