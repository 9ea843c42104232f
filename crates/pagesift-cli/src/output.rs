use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use pagesift_core::{FilteredDocument, PreviewReport};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the ranked preview: one line per matched page, then its snippet.
pub fn print_preview(
    w: &mut dyn Write,
    source_name: &str,
    report: &PreviewReport,
    color: ColorMode,
) -> std::io::Result<()> {
    let header = format!(
        "{} of {} pages in {} match",
        report.count, report.total_pages, source_name
    );
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    writeln!(w)?;

    for (rank, page) in report.pages.iter().enumerate() {
        let label = format!("[{}] page {}", rank + 1, page.page_number);
        if color.enabled() {
            writeln!(w, "{}", label.green().bold())?;
            writeln!(w, "    {}", page.text_snippet.dimmed())?;
        } else {
            writeln!(w, "{}", label)?;
            writeln!(w, "    {}", page.text_snippet)?;
        }
    }
    Ok(())
}

/// Report where the filtered document was written.
pub fn print_written(
    w: &mut dyn Write,
    path: &Path,
    document: &FilteredDocument,
    color: ColorMode,
) -> std::io::Result<()> {
    let pages: Vec<String> = document
        .page_order
        .iter()
        .map(|index| (index + 1).to_string())
        .collect();
    let msg = format!(
        "Wrote {} of {} pages to {}",
        document.page_order.len(),
        document.total_pages,
        path.display()
    );
    if color.enabled() {
        writeln!(w, "{}", msg.green())?;
        writeln!(w, "{}", format!("Page order: {}", pages.join(", ")).dimmed())?;
    } else {
        writeln!(w, "{}", msg)?;
        writeln!(w, "Page order: {}", pages.join(", "))?;
    }
    Ok(())
}

/// Report where the preview PDF was written.
pub fn print_preview_written(
    w: &mut dyn Write,
    path: &Path,
    pages: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    let msg = format!("Wrote preview ({} pages) to {}", pages, path.display());
    if color.enabled() {
        writeln!(w, "{}", msg.green())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Report that no page matched.
pub fn print_no_match(
    w: &mut dyn Write,
    source_name: &str,
    total_pages: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!(
        "No page of {} ({} pages) contains the requested terms",
        source_name, total_pages
    );
    if color.enabled() {
        writeln!(w, "{}", msg.yellow())
    } else {
        writeln!(w, "{}", msg)
    }
}
