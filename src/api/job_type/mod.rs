pub mod dto;
pub mod handlers;
pub mod service;

// Re-export commonly used types
pub use service::JobTypeService;
