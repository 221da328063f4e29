//! Layout engine: stamps all variable content onto the template.
//!
//! Every coordinate below is part of this crate's contract with the
//! template artwork (PDF-native, origin at the page's bottom-left) and
//! must stay in sync with it.

use tracing::debug;

use crate::error::Result;
use crate::format::{format_date, format_time};
use crate::pdf::content::{ContentBuilder, embed_qr_image};
use crate::pdf::fonts::{
    FONT_BOLD, FONT_REGULAR, StandardFont, create_font, ideal_font_size, text_width,
};
use crate::pdf::resources::update_page_resources;
use crate::pdf::template::{DocumentInfo, TemplateDocument};
use crate::qr::QrImage;
use crate::request::ApplicantRecord;

/// Checkbox y-coordinate on page 1 for each supported reason code.
pub const REASON_CHECKBOXES: &[(&str, f64)] = &[
    ("travail", 578.0),
    ("achats", 533.0),
    ("sante", 477.0),
    ("famille", 435.0),
    ("handicap", 396.0),
    ("sport_animaux", 358.0),
    ("convocation", 295.0),
    ("missions", 255.0),
    ("enfants", 211.0),
];

/// y-coordinate of the checkbox for a reason code, if the layout has one.
pub fn checkbox_y(code: &str) -> Option<f64> {
    REASON_CHECKBOXES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, y)| *y)
}

pub const ATTESTATION_INFO: DocumentInfo<'static> = DocumentInfo {
    title: "COVID-19 - Déclaration de déplacement",
    subject: "Attestation de déplacement dérogatoire",
    keywords: &[
        "covid19",
        "covid-19",
        "attestation",
        "déclaration",
        "déplacement",
        "officielle",
        "gouvernement",
    ],
    producer: "DNUM/SDIT",
    creator: "",
    author: "Ministère de l'intérieur",
};

const BODY_FONT_SIZE: f64 = 11.0;

const NAME_X: f64 = 119.0;
const NAME_Y: f64 = 696.0;
const BIRTH_DATE_X: f64 = 119.0;
const BIRTH_TOWN_X: f64 = 297.0;
const BIRTH_LINE_Y: f64 = 674.0;
const ADDRESS_X: f64 = 133.0;
const ADDRESS_Y: f64 = 652.0;

const CHECKBOX_X: f64 = 84.0;
const CHECKBOX_FONT_SIZE: f64 = 18.0;

const CITY_X: f64 = 105.0;
const CITY_Y: f64 = 177.0;
const CITY_MAX_WIDTH: f64 = 83.0;
const CITY_MIN_FONT_SIZE: f64 = 7.0;

const DEPARTURE_DATE_X: f64 = 91.0;
const DEPARTURE_TIME_X: f64 = 264.0;
const DEPARTURE_LINE_Y: f64 = 153.0;

const QR_SMALL_SIZE: f64 = 92.0;
const QR_SMALL_RIGHT_OFFSET: f64 = 156.0;
const QR_SMALL_BOTTOM: f64 = 100.0;
const QR_LARGE_SIZE: f64 = 300.0;
const QR_LARGE_X: f64 = 50.0;
const QR_LARGE_TOP_OFFSET: f64 = 350.0;

/// Mark one bold checkmark per reason code the catalog knows about.
/// Unknown codes have no visible effect.
fn draw_checkmarks<'a>(overlay: &mut ContentBuilder, codes: impl Iterator<Item = &'a str>) {
    for code in codes {
        match checkbox_y(code) {
            Some(y) => overlay.draw_text("x", CHECKBOX_X, y, CHECKBOX_FONT_SIZE, FONT_BOLD),
            None => debug!(code, "reason code without checkbox, skipped"),
        }
    }
}

/// Stamp all applicant content and the QR image onto the template.
///
/// Appends the second page before any page-2 drawing and embeds fonts
/// before any text draw, per the document's ordering requirements.
pub fn stamp_certificate(
    template: &mut TemplateDocument,
    record: &ApplicantRecord,
    qr: &QrImage,
) -> Result<()> {
    template.set_info(&ATTESTATION_INFO);

    let page1 = template.first_page();
    let page2 = template.append_page()?;
    let (page_width, page_height) = template.dimensions();

    let doc = template.doc_mut();
    let regular_id = create_font(doc, StandardFont::Helvetica);
    let bold_id = create_font(doc, StandardFont::HelveticaBold);
    let (qr_id, qr_name) = embed_qr_image(doc, qr)?;

    let departure_date = record.departure.map(|d| d.date());
    let departure_time = record.departure.map(|d| d.time());

    let mut overlay = ContentBuilder::new();
    overlay.draw_text(
        &record.full_name(),
        NAME_X,
        NAME_Y,
        BODY_FONT_SIZE,
        FONT_REGULAR,
    );
    overlay.draw_text(
        &format_date(record.birth_date, "/"),
        BIRTH_DATE_X,
        BIRTH_LINE_Y,
        BODY_FONT_SIZE,
        FONT_REGULAR,
    );
    overlay.draw_text(
        &record.birth_town,
        BIRTH_TOWN_X,
        BIRTH_LINE_Y,
        BODY_FONT_SIZE,
        FONT_REGULAR,
    );
    overlay.draw_text(
        &record.full_address(),
        ADDRESS_X,
        ADDRESS_Y,
        BODY_FONT_SIZE,
        FONT_REGULAR,
    );

    draw_checkmarks(&mut overlay, record.reason_codes());

    // City shrinks to fit its slot; at the floor size overflow is accepted
    let city_size = ideal_font_size(
        text_width,
        &record.city,
        CITY_MAX_WIDTH,
        CITY_MIN_FONT_SIZE,
        BODY_FONT_SIZE,
    );
    overlay.draw_text(&record.city, CITY_X, CITY_Y, city_size, FONT_REGULAR);

    // Departure date/time are fixed-size, unaffected by the city scan
    overlay.draw_text(
        &format_date(departure_date, "/"),
        DEPARTURE_DATE_X,
        DEPARTURE_LINE_Y,
        BODY_FONT_SIZE,
        FONT_REGULAR,
    );
    overlay.draw_text(
        &format_time(departure_time, ":"),
        DEPARTURE_TIME_X,
        DEPARTURE_LINE_Y,
        BODY_FONT_SIZE,
        FONT_REGULAR,
    );

    overlay.draw_image(
        &qr_name,
        qr_id,
        page_width - QR_SMALL_RIGHT_OFFSET,
        QR_SMALL_BOTTOM,
        QR_SMALL_SIZE,
        QR_SMALL_SIZE,
    );

    template.append_page_contents(page1, overlay.build_content_bytes())?;
    update_page_resources(
        template.doc_mut(),
        page1,
        &[(FONT_REGULAR, regular_id), (FONT_BOLD, bold_id)],
        &overlay.xobjects,
    );

    let mut second_page = ContentBuilder::new();
    second_page.draw_image(
        &qr_name,
        qr_id,
        QR_LARGE_X,
        page_height - QR_LARGE_TOP_OFFSET,
        QR_LARGE_SIZE,
        QR_LARGE_SIZE,
    );
    template.set_page_contents(page2, second_page.build_content_bytes())?;
    update_page_resources(template.doc_mut(), page2, &[], &second_page.xobjects);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_y_known_codes() {
        assert_eq!(checkbox_y("travail"), Some(578.0));
        assert_eq!(checkbox_y("sante"), Some(477.0));
        assert_eq!(checkbox_y("enfants"), Some(211.0));
    }

    #[test]
    fn test_checkbox_y_unknown_code() {
        assert_eq!(checkbox_y("promenade"), None);
        assert_eq!(checkbox_y(""), None);
        // Matching is exact, not containment
        assert_eq!(checkbox_y("travail, sante"), None);
    }

    fn checkmark_ops(reasons: &str) -> Vec<String> {
        let mut overlay = ContentBuilder::new();
        draw_checkmarks(
            &mut overlay,
            reasons.split(',').map(str::trim).filter(|s| !s.is_empty()),
        );
        overlay.content_parts
    }

    #[test]
    fn test_two_matching_reasons_draw_two_checkmarks() {
        let ops = checkmark_ops("travail, sante");
        assert_eq!(ops.len(), 2);
        assert!(ops[0].contains("84 578 Td"));
        assert!(ops[1].contains("84 477 Td"));
        // No other catalog coordinate is marked
        for (_, y) in REASON_CHECKBOXES {
            let marked = ops.iter().any(|op| op.contains(&format!("84 {} Td", y)));
            assert_eq!(marked, *y == 578.0 || *y == 477.0);
        }
    }

    #[test]
    fn test_no_matching_reason_draws_nothing() {
        assert!(checkmark_ops("promenade, chien").is_empty());
        assert!(checkmark_ops("").is_empty());
    }

    #[test]
    fn test_unknown_codes_are_skipped_among_matches() {
        let ops = checkmark_ops("promenade, travail");
        assert_eq!(ops.len(), 1);
        assert!(ops[0].contains("84 578 Td"));
    }
}
