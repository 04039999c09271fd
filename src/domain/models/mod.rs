pub mod image;
pub mod page;
pub mod store_config;

pub use image::*;
pub use page::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Page, PageRequest, paginate};
pub use store_config::{StoreConfig, UrlStyle};
