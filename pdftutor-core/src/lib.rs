// PDF Tutor Core Library
//
// Turns a tutor model's free-text answer into annotation directives and
// resolves highlight directives against the text layer of a rendered page.
// Everything that talks to the outside world (model, renderer, storage)
// sits behind a trait.

pub mod types;
pub mod geometry;
pub mod error;
pub mod config;
pub mod extractor;
pub mod resolver;
pub mod surface;
pub mod viewer;
pub mod storage;
pub mod prompt;
pub mod session;

// Re-export main types and functions for easy use
pub use types::*;
pub use geometry::{BoundingBox, PageOrigin};
pub use error::DirectiveError;
pub use config::TutorConfig;
pub use extractor::{extract, CommandExtractor};
pub use resolver::{resolve, HighlightResolver, MatchTier};
pub use surface::{RenderSurface, RenderWorker, StaticSurface};
pub use viewer::{AnnotationViewer, ReplaySummary};
pub use storage::{AnnotationRecord, AnnotationStore, FileAnnotationStore, NoOpStore};
pub use prompt::{TextGenerator, TutorPrompt};
pub use session::{TutorReply, TutorSession};
