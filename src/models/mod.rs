mod metadata;
mod snippet;

pub use metadata::{Candidate, Field, MetadataRecord};
pub use snippet::RichSnippet;
