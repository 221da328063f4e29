//! The generation pipeline, from applicant record to rendered document.

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::error::{CertificateError, Result};
use crate::format::{format_date_alternate, format_time};
use crate::payload::build_payload;
use crate::pdf::layout::stamp_certificate;
use crate::pdf::template::TemplateDocument;
use crate::qr;
use crate::request::{ApplicantRecord, CertificateQuery, HttpResponse};

/// Final binary document plus its download filename.
#[derive(Debug)]
pub struct RenderedCertificate {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Download filename derived from the departure timestamp.
///
/// The year-day-month order is inherited from the official layout and
/// kept for compatibility.
pub fn attestation_filename(departure: Option<NaiveDateTime>) -> String {
    format!(
        "attestation-{}-{}.pdf",
        format_date_alternate(departure.map(|d| d.date()), "-"),
        format_time(departure.map(|d| d.time()), "-")
    )
}

async fn load_template(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(CertificateError::TemplateLoad)
}

/// Run the full pipeline: payload, QR image and template load, layout,
/// serialization.
///
/// `generated_at` stamps the payload's creation line; callers inject it
/// so the payload is reproducible under a fixed clock.
pub async fn generate(
    record: &ApplicantRecord,
    template_path: &Path,
    generated_at: NaiveDateTime,
) -> Result<RenderedCertificate> {
    let payload = build_payload(record, generated_at);
    debug!(payload_len = payload.len(), "QR payload assembled");

    // Template bytes and QR image are independent; join before layout
    let (template_bytes, qr_image) =
        tokio::try_join!(load_template(template_path), async { qr::encode(&payload) })?;

    let mut template = TemplateDocument::from_bytes(&template_bytes)?;
    stamp_certificate(&mut template, record, &qr_image)?;

    let bytes = template.finish()?;
    let filename = attestation_filename(record.departure);
    info!(%filename, size = bytes.len(), "attestation rendered");

    Ok(RenderedCertificate { bytes, filename })
}

/// Boundary entry point: raw query in, response envelope out.
pub async fn handle_query(
    query: &CertificateQuery,
    template_path: &Path,
) -> Result<HttpResponse> {
    let record = ApplicantRecord::from_query(query);
    let certificate = generate(&record, template_path, Local::now().naive_local()).await?;
    Ok(HttpResponse::from_certificate(&certificate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_filename_year_day_month_order() {
        let departure = NaiveDate::from_ymd_opt(2021, 4, 16).and_then(|d| d.and_hms_opt(14, 5, 0));
        assert_eq!(
            attestation_filename(departure),
            "attestation-2021-16-04-14-05.pdf"
        );
    }

    #[test]
    fn test_filename_with_missing_departure_still_derives() {
        let expected = format!("attestation-{}-{}.pdf", "----------", "-----");
        assert_eq!(attestation_filename(None), expected);
    }
}
