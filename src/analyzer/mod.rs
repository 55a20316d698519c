// Analyzer module: the marker rule table and the annotation pass built on it.

pub mod annotator;
pub mod rules;

// Re-export the main Annotator implementation for ease of use.
pub use annotator::{AnnotateOptions, AnnotationResult, Annotator, AnnotatorImpl};
