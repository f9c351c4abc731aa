// Application layer - Use cases over the domain and the data source boundary
pub mod data_source_repository;
pub mod preview_service;
pub mod template_service;
pub mod widget_engine;
