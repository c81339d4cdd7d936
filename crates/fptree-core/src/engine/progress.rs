//! Callback-based progress reporting.
//!
//! The core never prints; callers that want feedback (a CLI progress bar,
//! a log line per stage) register a callback and receive [`Progress`]
//! events as the pipeline advances.

#[derive(Debug, Clone)]
pub enum Progress {
    StageStart { name: &'static str },
    StageFinish,

    /// One neighbor-joining iteration completed; `remaining` live nodes left.
    JoinStep { remaining: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
