pub mod health_handlers;
pub mod image_handlers;
pub mod session_handlers;

pub use health_handlers::*;
pub use image_handlers::*;
pub use session_handlers::*;
