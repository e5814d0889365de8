pub mod editor;

pub use editor::{Draft, EditorOutcome, EditorState, RecordEditor};
