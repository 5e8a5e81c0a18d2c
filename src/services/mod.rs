pub mod confluence;
pub mod enumerator;
pub mod publisher;
pub mod renderer;

pub use confluence::{ApiResponse, ConfluenceClient, PageApi};
pub use enumerator::InputEnumerator;
pub use publisher::PagePublisher;
pub use renderer::MarkdownRenderer;
