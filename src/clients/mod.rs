pub mod http_store;
pub mod memory_store;
pub mod question_store;

pub use http_store::HttpQuestionStore;
pub use memory_store::{MemoryQuestionStore, StoreCall};
pub use question_store::QuestionStore;
