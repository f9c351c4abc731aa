// Domain layer - Pure widget aggregation and dashboard template models
pub mod aggregation;
pub mod dashboard;
pub mod data_source;
pub mod error;
pub mod filter;
pub mod format;
pub mod layout;
pub mod palette;
pub mod scalar;
pub mod series;
pub mod widget;
