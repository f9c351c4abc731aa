// Widget aggregation engine and dashboard template service
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::aggregation::{compute, EngineOptions};
pub use domain::dashboard::{remap, DashboardInstance, DashboardModel};
pub use domain::data_source::DataSource;
pub use domain::error::{RemapError, WidgetConfigError};
pub use domain::series::{AggregatedSeries, SeriesPoint, WidgetData};
pub use domain::widget::WidgetConfig;
