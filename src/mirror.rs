//! Best-effort echo of formatted lines to a secondary stream.
use std::fmt;
use std::io::{self, Write};

/// Where mirrored lines go.
enum Target {
    Stderr,
    Writer(Box<dyn Write + Send>),
}

/// Echoes formatted log lines to stderr or an injected writer.
///
/// Errors on the secondary stream are ignored; the log file is the durable
/// copy.
pub struct ConsoleMirror {
    enabled: bool,
    target: Target,
}

impl fmt::Debug for ConsoleMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Target::Stderr => "stderr",
            Target::Writer(_) => "writer",
        };
        f.debug_struct("ConsoleMirror")
            .field("enabled", &self.enabled)
            .field("target", &target)
            .finish()
    }
}

impl ConsoleMirror {
    /// Mirror to stderr when `enabled`.
    #[must_use]
    pub const fn stderr(enabled: bool) -> Self {
        Self {
            enabled,
            target: Target::Stderr,
        }
    }

    /// Mirror to `writer` when `enabled`.
    #[must_use]
    pub fn to_writer(enabled: bool, writer: Box<dyn Write + Send>) -> Self {
        Self {
            enabled,
            target: Target::Writer(writer),
        }
    }

    /// Whether lines are mirrored at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Write `text` to the secondary stream, ignoring any error.
    pub fn mirror(&mut self, text: &str) {
        if !self.enabled {
            return;
        }
        match &mut self.target {
            Target::Stderr => {
                let mut stderr = io::stderr().lock();
                stderr.write_all(text.as_bytes()).ok();
                stderr.flush().ok();
            }
            Target::Writer(w) => {
                w.write_all(text.as_bytes()).ok();
                w.flush().ok();
            }
        }
    }
}
