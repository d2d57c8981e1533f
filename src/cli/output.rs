//! Terminal display of streamed replies

use async_trait::async_trait;
use console::{Term, measure_text_width, style};
use savemylove_core::streaming::AccumulatingSink;
use savemylove_core::{DeltaSink, DisplayBuffer, Language, SinkError};
use std::io;
use termimad::MadSkin;

/// Prints each delta as it arrives while keeping the normalized display
/// buffer up to date for the final render.
pub struct TerminalSink {
    inner: AccumulatingSink,
    term: Term,
    live: bool,
}

impl TerminalSink {
    /// Live echo only happens while `display` follows new output, so a
    /// display configured without auto-scroll shows just the final render.
    pub fn new(term: Term, live: bool, display: DisplayBuffer) -> Self {
        let live = live && display.is_following();
        Self {
            inner: AccumulatingSink::with_display(display),
            term,
            live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn normalized(&self) -> &str {
        self.inner.display().content()
    }

    pub fn raw(&self) -> &str {
        self.inner.result().as_str()
    }

    /// Remove the live output so the rendered version can replace it
    pub fn clear_live_output(&self) -> io::Result<()> {
        if !self.live || self.raw().is_empty() {
            return Ok(());
        }
        self.term.write_line("")?;
        let width = usize::from(self.term.size().1);
        self.term.clear_last_lines(rendered_rows(self.raw(), width))
    }
}

#[async_trait]
impl DeltaSink for TerminalSink {
    async fn deliver(&mut self, delta: &str) -> Result<(), SinkError> {
        // A failed write is retried with the same delta; accumulate only
        // once it is on screen.
        if self.live {
            self.term.write_str(delta).map_err(write_error)?;
        }
        self.inner.deliver(delta).await
    }
}

fn write_error(err: io::Error) -> SinkError {
    if err.kind() == io::ErrorKind::BrokenPipe {
        SinkError::disconnected()
    } else {
        SinkError::new(err.to_string())
    }
}

/// Terminal rows `text` occupies once wrapped at `width` columns
fn rendered_rows(text: &str, width: usize) -> usize {
    text.split('\n')
        .map(|line| {
            let columns = measure_text_width(line);
            if width == 0 || columns == 0 {
                1
            } else {
                columns.div_ceil(width)
            }
        })
        .sum()
}

pub fn print_heading(language: Language) {
    println!("{}", style(language.analysis_result()).magenta().bold());
    println!();
}

pub fn print_markdown(markdown: &str) {
    let skin = MadSkin::default();
    skin.print_text(markdown);
}
