// Application state for HTTP handlers
use crate::application::data_source_repository::DataSourceRepository;
use crate::application::preview_service::PreviewService;
use crate::application::template_service::TemplateService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn DataSourceRepository>,
    pub preview_service: PreviewService,
    pub template_service: TemplateService,
}
