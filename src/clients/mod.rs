pub mod calendar_client;
pub mod openai_client;
