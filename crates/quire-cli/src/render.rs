//! Terminal renderer: one block per view on stdout.

use std::io::Write;

use quire_core::domain::{DisplayItem, DisplayView};
use quire_core::ports::Renderer;

pub struct StdoutRenderer;

impl Renderer for StdoutRenderer {
    fn render(&self, view: &DisplayView) {
        let mut out = std::io::stdout().lock();
        // stdout closed (e.g. piped into head): nothing useful to do
        let _ = write_view(&mut out, view).and_then(|()| out.flush());
    }
}

pub fn write_view(out: &mut impl Write, view: &DisplayView) -> std::io::Result<()> {
    let c = &view.counts;
    writeln!(
        out,
        "-- {} items | pending {} | downloading {} | completed {} | failed {} | skipped {}",
        c.total, c.pending, c.downloading, c.completed, c.failed, c.skipped
    )?;
    for item in &view.items {
        writeln!(out, "{}", format_item(item))?;
    }
    Ok(())
}

fn format_item(item: &DisplayItem) -> String {
    let key = match item.key {
        quire_core::domain::DisplayKey::Current => "*".to_string(),
        quire_core::domain::DisplayKey::Task(id) => id.to_string(),
    };
    let mut line = format!("{key:<31} {:<12} {}", item.status.as_str(), item.label());
    if let Some(p) = item.progress {
        line.push_str(&format!(" [{p:>3}%]"));
    }
    if let Some(msg) = &item.message {
        line.push_str(" - ");
        line.push_str(msg);
    }
    line
}
