// Domain errors
use super::widget::WidgetKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetConfigError {
    #[error("{kind:?} widget has no data source")]
    MissingSource { kind: WidgetKind },
    #[error("{kind:?} widget has no value column")]
    MissingColumnY { kind: WidgetKind },
    #[error("{kind:?} widget has no category column")]
    MissingColumnX { kind: WidgetKind },
}

/// Failures while materializing a dashboard model into an instance.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemapError {
    #[error("source '{source_ref}' has schema '{got_tag}', expected '{expected_tag}'")]
    IncompatibleSchema {
        source_ref: String,
        expected_tag: String,
        got_tag: String,
    },
    #[error("no replacement chosen for source '{source_ref}'")]
    UnresolvedReference { source_ref: String },
}
