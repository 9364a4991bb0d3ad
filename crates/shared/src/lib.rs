// Public modules
pub mod classifier;
pub mod composer;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod openai;
pub mod session;
pub mod website;

// Re-export commonly used types
pub use classifier::{LinkSelection, SelectedLink};
pub use config::Config;
pub use fetcher::PageFetcher;
pub use openai::OpenAiClient;
pub use session::{ChatTurn, Session, SessionState};
pub use website::Website;
