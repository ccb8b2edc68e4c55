pub mod llm_client;
pub mod sheet_client;

pub use llm_client::LlmClient;
pub use sheet_client::SheetClient;
