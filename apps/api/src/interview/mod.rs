pub mod controller;
pub mod flow;
pub mod guard;
pub mod handlers;
pub mod prompts;
pub mod session;

pub use controller::InterviewController;
