pub mod handlers;
pub mod linkedin;
pub mod prompts;
pub mod resume;
pub mod resume_data;
pub mod roadmap;
pub mod validation;
