//! Minimal page layout engine.
//!
//! Positions are millimetres from the top-left corner of the page. Text is
//! anchored at its baseline. The engine keeps a vertical cursor and starts a
//! new page whenever a block would cross the bottom margin.

/// A4 portrait
pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Normal,
    Bold,
}

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        x: f64,
        y: f64,
        size: f64,
        weight: Weight,
        text: String,
    },
    /// Filled rectangle; `gray` is a luma level (0 black, 255 white)
    Fill {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        gray: u8,
    },
    /// Horizontal rule
    Rule {
        x: f64,
        y: f64,
        length: f64,
        thickness: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<Op>,
}

impl Page {
    /// Text runs on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            Op::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A laid-out, paginated document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text run in the document, page by page
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| page.texts())
    }
}

/// Cursor-driven writer that produces a `Document`
#[derive(Debug)]
pub struct Layout {
    width: f64,
    height: f64,
    margin: f64,
    y: f64,
    pages: Vec<Page>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(PAGE_WIDTH, PAGE_HEIGHT, MARGIN)
    }
}

impl Layout {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
            y: margin,
            pages: vec![Page::default()],
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Current vertical cursor
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    /// Start a new page when `needed` millimetres do not fit below the cursor.
    /// Returns whether a page was added.
    pub fn ensure_space(&mut self, needed: f64) -> bool {
        if self.y + needed > self.height - self.margin {
            self.pages.push(Page::default());
            self.y = self.margin;
            tracing::debug!(page = self.pages.len(), "page break");
            return true;
        }
        false
    }

    fn push(&mut self, op: Op) {
        // `pages` always holds at least one page
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Text at horizontal offset `dx` from the left margin, on the cursor line
    pub fn text(&mut self, dx: f64, size: f64, weight: Weight, text: impl Into<String>) {
        let x = self.margin + dx;
        self.text_at(x, size, weight, text);
    }

    /// Text at an absolute horizontal position, on the cursor line
    pub fn text_at(&mut self, x: f64, size: f64, weight: Weight, text: impl Into<String>) {
        let y = self.y;
        self.push(Op::Text {
            x,
            y,
            size,
            weight,
            text: text.into(),
        });
    }

    /// Full-width band starting `above` millimetres over the cursor line
    pub fn band(&mut self, above: f64, height: f64, gray: u8) {
        let (x, y, width) = (self.margin, self.y - above, self.content_width());
        self.push(Op::Fill {
            x,
            y,
            width,
            height,
            gray,
        });
    }

    /// Full-width rule on the cursor line
    pub fn rule(&mut self, thickness: f64) {
        let (x, y, length) = (self.margin, self.y, self.content_width());
        self.push(Op::Rule {
            x,
            y,
            length,
            thickness,
        });
    }

    pub fn finish(self) -> Document {
        Document {
            width: self.width,
            height: self.height,
            margin: self.margin,
            pages: self.pages,
        }
    }
}

/// Cut `text` to at most `max` characters
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
