use std::sync::Arc;

pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// The single human-readable status line of a session. Every pipeline step
/// overwrites it; an optional listener sees each new value.
#[derive(Default, Clone)]
pub struct PipelineStatus {
    text: String,
    listener: Option<ProgressCallback>,
}

impl PipelineStatus {
    pub fn new(listener: Option<ProgressCallback>) -> Self {
        Self {
            text: String::new(),
            listener,
        }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if let Some(listener) = &self.listener {
            listener(&self.text);
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Debug for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineStatus")
            .field("text", &self.text)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
