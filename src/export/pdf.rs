//! PDF rendering of the report layout (printpdf builtin fonts)

use crate::error::{Result, VitalsError};
use printpdf::*;
use scene_vitals_common::export::{ReportDocument, TextStyle};
use scene_vitals_common::layout::pt_to_mm;

const LAYER_NAME: &str = "Layer 1";

/// Renders every page of the layout into PDF bytes.
pub fn render_pdf(report: &ReportDocument) -> Result<Vec<u8>> {
    let layout = report.layout;
    let page_w = Mm(pt_to_mm(layout.page_width_pt));
    let page_h = Mm(pt_to_mm(layout.page_height_pt));

    let (doc, first_page, first_layer) = PdfDocument::new(report.title.as_str(), page_w, page_h, LAYER_NAME);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| VitalsError::PdfGeneration(format!("font error: {:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| VitalsError::PdfGeneration(format!("font error: {:?}", e)))?;

    for (index, page) in report.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(page_w, page_h, LAYER_NAME)
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        for line in &page.lines {
            let font = match line.style {
                TextStyle::Regular => &regular,
                TextStyle::Bold => &bold,
            };
            // top-left origin → PDF bottom-left origin
            let y = layout.page_height_pt - line.y_pt;
            layer.use_text(
                line.text.clone(),
                line.font_size,
                Mm(pt_to_mm(line.x_pt)),
                Mm(pt_to_mm(y)),
                font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| VitalsError::PdfGeneration(format!("save error: {:?}", e)))
}
