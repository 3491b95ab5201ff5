// Summary Endpoint: validates requests, calls the Model Client, maps outcomes.
// All model calls go through the `Summarizer` trait in llm_client.

pub mod handlers;
pub mod models;
pub mod pdf;
