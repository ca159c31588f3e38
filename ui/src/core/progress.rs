//! Step-by-step progress text shown while an upload is crunched.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressLog {
    lines: Vec<String>,
    open: bool,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new step; the previous one (if still open) is marked done.
    pub fn step(&mut self, text: impl Into<String>) {
        self.close_open_step();
        let text = text.into();
        tracing::debug!(step = %text, "progress");
        self.lines.push(format!("{text}..."));
        self.open = true;
    }

    /// Close the running step and append a final line (e.g. an error).
    pub fn finish(&mut self, text: impl Into<String>) {
        self.close_open_step();
        self.lines.push(text.into());
    }

    fn close_open_step(&mut self) {
        if self.open {
            if let Some(last) = self.lines.last_mut() {
                last.push_str(" Done");
            }
            self.open = false;
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
