pub mod barcode;
pub mod template;

use crate::domain::model::{BadgeRecord, RenderedBadge};
use crate::utils::error::Result;
use barcode::Barcode;
use template::BadgeTemplate;

/// File stem for a ticket token. ASCII letters, digits and `-` are kept;
/// every other byte, `_` included, becomes `_XX` (uppercase hex), so two
/// distinct tokens never share a stem.
pub fn file_stem(token: &str) -> String {
    let mut stem = String::with_capacity(token.len());
    for byte in token.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02X}", byte));
        }
    }
    stem
}

/// Barcode PNG and badge SVG for one record.
pub fn render_badge(template: &BadgeTemplate, record: BadgeRecord) -> Result<RenderedBadge> {
    let stem = file_stem(&record.token);
    let barcode_file = format!("{}.png", stem);
    let badge_file = format!("{}.svg", stem);

    let barcode_png = Barcode::new(&record.token)?.to_png()?;
    let badge_svg = template.render(&record, &barcode_file);

    Ok(RenderedBadge {
        record,
        barcode_file,
        barcode_png,
        badge_file,
        badge_svg,
    })
}
