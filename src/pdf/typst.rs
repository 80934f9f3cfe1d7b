use std::fmt::Write as _;
use std::path::Path;
use std::process::Command;

use crate::error::{InvoiceError, Result};
use crate::export::layout::{Document, Op, Weight};

/// Millimetres per typographic point
const MM_PER_PT: f64 = 0.3528;
/// Distance from the top of a Typst text box to its baseline, in ems
const CAP_HEIGHT: f64 = 0.7;

/// Quote a string as a Typst string literal
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn render_op(out: &mut String, op: &Op) {
    // Writing into a String cannot fail
    let _ = match op {
        Op::Text {
            x,
            y,
            size,
            weight,
            text,
        } => {
            let top = y - size * MM_PER_PT * CAP_HEIGHT;
            let weight = match weight {
                Weight::Bold => "bold",
                Weight::Normal => "regular",
            };
            writeln!(
                out,
                "#place(top + left, dx: {x:.2}mm, dy: {top:.2}mm, text(size: {size}pt, weight: \"{weight}\", {}))",
                quote(text)
            )
        }
        Op::Fill {
            x,
            y,
            width,
            height,
            gray,
        } => writeln!(
            out,
            "#place(top + left, dx: {x:.2}mm, dy: {y:.2}mm, rect(width: {width:.2}mm, height: {height:.2}mm, fill: luma({gray}), stroke: none))"
        ),
        Op::Rule {
            x,
            y,
            length,
            thickness,
        } => writeln!(
            out,
            "#place(top + left, dx: {x:.2}mm, dy: {y:.2}mm, line(length: {length:.2}mm, stroke: {thickness:.2}mm + black))"
        ),
    };
}

/// Render a laid-out document as Typst markup, one `#pagebreak()` between pages
pub fn render(document: &Document) -> String {
    let mut out = String::new();
    out.push_str("// Invoice document\n");
    let _ = writeln!(
        out,
        "#set page(width: {}mm, height: {}mm, margin: 0mm)",
        document.width, document.height
    );
    out.push_str("#set text(font: \"Helvetica\", size: 10pt)\n");

    for (index, page) in document.pages.iter().enumerate() {
        if index > 0 {
            out.push_str("#pagebreak()\n");
        }
        for op in &page.ops {
            render_op(&mut out, op);
        }
    }

    out
}

/// Compile Typst source to PDF using the Typst CLI
pub fn compile(source: &str, output_path: &Path) -> Result<()> {
    // Check if typst is available
    let typst_check = Command::new("typst").arg("--version").output();

    if typst_check.is_err() {
        return Err(InvoiceError::TypstNotFound);
    }

    // Create temp directory for the source
    let temp_dir = std::env::temp_dir().join("invoice-details");
    std::fs::create_dir_all(&temp_dir)?;

    let source_path = temp_dir.join(format!("document-{}.typ", std::process::id()));
    std::fs::write(&source_path, source)?;

    let output = Command::new("typst")
        .arg("compile")
        .arg("--root")
        .arg(&temp_dir)
        .arg(&source_path)
        .arg(output_path)
        .output();

    // Clean up temp files
    let _ = std::fs::remove_file(&source_path);

    let output = output?;
    if !output.status.success() {
        let _ = std::fs::remove_file(output_path);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InvoiceError::PdfGeneration(stderr.to_string()));
    }

    Ok(())
}
