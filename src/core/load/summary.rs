//! Load summary and reporting

use std::time::Duration;

/// Type of load error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Connection or pool error
    Connection,
    /// Source file error
    Extract,
    /// Storage error (PostgreSQL)
    Storage,
    /// Reject sink error
    Sink,
    /// Configuration error
    Configuration,
}

/// Load error with context
#[derive(Debug, Clone)]
pub struct LoadError {
    /// Type of error
    pub kind: LoadErrorKind,

    /// Error message
    pub message: String,

    /// Optional context (e.g., file path, entity)
    pub context: Option<String>,
}

impl LoadError {
    /// Create a new load error
    pub fn new(kind: LoadErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

/// Summary of a load run
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Total number of rows read from the source files
    pub total_rows: usize,

    /// Number of rows upserted into the target store
    pub accepted: usize,

    /// Number of rows diverted to the reject sink
    pub rejected: usize,

    /// Duration of the run
    pub duration: Duration,

    /// Fatal errors encountered (rejections are not errors)
    pub errors: Vec<LoadError>,
}

impl LoadSummary {
    /// Create a new empty load summary
    pub fn new() -> Self {
        Self {
            total_rows: 0,
            accepted: 0,
            rejected: 0,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add a fatal error
    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    /// Merge another summary into this one (e.g., customers then cards)
    pub fn merge(&mut self, other: LoadSummary) {
        self.total_rows += other.total_rows;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.errors.extend(other.errors);
    }

    /// Check if the run completed without fatal errors
    ///
    /// Rejected rows do not make a run unsuccessful: they are accounted
    /// for in the reject sink.
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get acceptance rate as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 100.0;
        }
        (self.accepted as f64 / self.total_rows as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_rows = self.total_rows,
            accepted = self.accepted,
            rejected = self.rejected,
            duration_secs = self.duration.as_secs(),
            acceptance_rate = format!("{:.2}%", self.acceptance_rate()),
            "Load completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Load completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    kind = ?error.kind,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Load error"
                );
            }
        }
    }
}

impl Default for LoadSummary {
    fn default() -> Self {
        Self::new()
    }
}
