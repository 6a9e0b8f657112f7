//! Report page layout
//!
//! All positions are in points measured from the top-left corner; the PDF
//! renderer flips them to its bottom-left origin.

pub const MM_PER_PT: f32 = 25.4 / 72.0;

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportLayout {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_pt: f32,
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    /// Line advance as a multiple of the font size
    pub leading: f32,
    /// Indent for entry lines under a firefighter heading
    pub indent_pt: f32,
}

impl ReportLayout {
    pub fn a4() -> Self {
        Self {
            page_width_pt: 595.0,
            page_height_pt: 842.0,
            margin_pt: 40.0,
            title_size: 18.0,
            heading_size: 13.0,
            body_size: 10.0,
            leading: 1.4,
            indent_pt: 12.0,
        }
    }

    /// Lowest allowed baseline, measured from the top.
    pub fn content_limit_pt(&self) -> f32 {
        self.page_height_pt - self.margin_pt
    }

    pub fn content_width_pt(&self) -> f32 {
        self.page_width_pt - self.margin_pt * 2.0
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.leading
    }

    /// Characters of body text that fit on one line at the given indent.
    pub fn wrap_chars(&self, indent_pt: f32) -> usize {
        let width = (self.content_width_pt() - indent_pt).max(self.body_size);
        (width / (self.body_size * AVG_GLYPH_WIDTH)).floor().max(1.0) as usize
    }
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::a4()
    }
}
