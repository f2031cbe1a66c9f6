pub mod meeting;
pub mod task;
