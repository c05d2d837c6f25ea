use crate::config::OutputTarget;
use crate::runtime::capabilities::WriteCapability;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Object;
use std::any::Any;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Text sink backed by the process's standard output or standard error.
#[derive(Debug, Clone, Copy)]
pub struct StdStream {
    target: OutputTarget,
}

impl StdStream {
    pub fn new(target: OutputTarget) -> Self {
        StdStream { target }
    }
}

impl Object for StdStream {
    fn type_name(&self) -> &str {
        "TextIOWrapper"
    }

    fn repr(&self) -> String {
        format!("<{}>", self.target.as_str())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_write(&self) -> Option<&dyn WriteCapability> {
        Some(self)
    }
}

impl WriteCapability for StdStream {
    fn write(&self, text: &str) -> RuntimeResult<()> {
        match self.target {
            OutputTarget::Stdout => std::io::stdout().lock().write_all(text.as_bytes())?,
            OutputTarget::Stderr => std::io::stderr().lock().write_all(text.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> RuntimeResult<()> {
        match self.target {
            OutputTarget::Stdout => std::io::stdout().lock().flush()?,
            OutputTarget::Stderr => std::io::stderr().lock().flush()?,
        }
        Ok(())
    }
}

/// In-memory text sink; collects everything written to it.
#[derive(Debug, Default)]
pub struct TextSink {
    buffer: Mutex<String>,
    flushes: AtomicUsize,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buffer) => buffer.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of times the sink was flushed.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl Object for TextSink {
    fn type_name(&self) -> &str {
        "StringIO"
    }

    fn repr(&self) -> String {
        "<StringIO>".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_write(&self) -> Option<&dyn WriteCapability> {
        Some(self)
    }
}

impl WriteCapability for TextSink {
    fn write(&self, text: &str) -> RuntimeResult<()> {
        self.buffer
            .lock()
            .map_err(|e| RuntimeError::InternalError(format!("Mutex poisoned: {}", e)))?
            .push_str(text);
        Ok(())
    }

    fn flush(&self) -> RuntimeResult<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
