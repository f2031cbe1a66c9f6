pub mod calendar_service;
pub mod dispatcher;
pub mod openai_service;
pub mod routing;
pub mod slot_service;
