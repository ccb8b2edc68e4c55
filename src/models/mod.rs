pub mod draft;
pub mod mistake;
pub mod subject;

pub use draft::{field_or_placeholder, QuestionDraft, MISSING_FIELD_PLACEHOLDER};
pub use mistake::{MistakeRecord, SHEET_COLUMNS};
pub use subject::Subject;
