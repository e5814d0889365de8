pub mod loaders;
pub mod question;

pub use loaders::load_seed_file;
pub use question::{
    QuestionPayload, QuestionRecord, QuestionType, QuizGrouping, COPY_MARKER, DEFAULT_POINTS,
    DEFAULT_TIME_LIMIT_SECONDS, MIN_TIME_LIMIT_SECONDS,
};
