pub mod handlers;
pub mod memory;
pub mod postgres;
pub mod resumes;
pub mod store;

pub use memory::MemoryHistoryStore;
pub use postgres::PgHistoryStore;
pub use store::HistoryStore;
