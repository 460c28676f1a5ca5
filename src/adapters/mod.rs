// Adapters layer: concrete implementations for external systems (http sources, storage).

pub mod http;
pub mod static_pages;
pub mod storage;
pub mod storefront;
