pub mod image_archiver;
pub mod mistake_store;
pub mod question_generator;

pub use image_archiver::ImageArchiver;
pub use mistake_store::{MistakeStore, StoreBackend};
pub use question_generator::QuestionGenerator;
