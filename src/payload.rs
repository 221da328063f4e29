//! QR payload assembly.
//!
//! The payload is the exact text block scanned from the QR code: an
//! ordered list of labeled lines joined with `";\n "`. Labels, field
//! order, and separators are a fixed wire format and must not change.

use chrono::NaiveDateTime;

use crate::format::{format_date, format_date_alternate, format_time};
use crate::request::ApplicantRecord;

/// Build the canonical payload text for an applicant record.
///
/// Deterministic for a fixed `generated_at`; the generation clock is the
/// only non-input the payload depends on, so callers inject it.
pub fn build_payload(record: &ApplicantRecord, generated_at: NaiveDateTime) -> String {
    let departure_date = record.departure.map(|d| d.date());
    let departure_time = record.departure.map(|d| d.time());

    [
        format!(
            "Cree le: {} a {}",
            format_date_alternate(Some(generated_at.date()), "-"),
            format_time(Some(generated_at.time()), ":")
        ),
        format!("Nom: {}", record.last_name),
        format!("Prenom: {}", record.first_name),
        format!(
            "Naissance: {} a {}",
            format_date(record.birth_date, "/"),
            record.birth_town
        ),
        format!(
            "Adresse: {} {} {}",
            record.address, record.zip_code, record.city
        ),
        format!(
            "Sortie: {} a {}",
            format_date(departure_date, "/"),
            format_time(departure_time, ":")
        ),
        format!("Motifs: {}", record.reasons),
    ]
    .join(";\n ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record() -> ApplicantRecord {
        ApplicantRecord {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 2),
            birth_town: "Paris".to_string(),
            address: "10 rue de la Paix".to_string(),
            zip_code: "75002".to_string(),
            city: "Paris".to_string(),
            departure: NaiveDate::from_ymd_opt(2021, 4, 16)
                .and_then(|d| d.and_hms_opt(14, 5, 0)),
            reasons: "travail, sante".to_string(),
        }
    }

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 4, 16)
            .and_then(|d| d.and_hms_opt(14, 5, 0))
            .unwrap()
    }

    #[test]
    fn test_payload_exact_wire_format() {
        let payload = build_payload(&sample_record(), fixed_clock());
        let expected = "Cree le: 2021-16-04 a 14:05;\n \
                        Nom: Dupont;\n \
                        Prenom: Jean;\n \
                        Naissance: 02/01/1990 a Paris;\n \
                        Adresse: 10 rue de la Paix 75002 Paris;\n \
                        Sortie: 16/04/2021 a 14:05;\n \
                        Motifs: travail, sante";
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_payload_is_deterministic_under_fixed_clock() {
        let record = sample_record();
        let clock = fixed_clock();
        assert_eq!(build_payload(&record, clock), build_payload(&record, clock));
    }

    #[test]
    fn test_payload_propagates_invalid_dates_as_placeholders() {
        let mut record = sample_record();
        record.birth_date = None;
        record.departure = None;
        let payload = build_payload(&record, fixed_clock());
        assert!(payload.contains("Naissance: --/--/---- a Paris"));
        assert!(payload.contains("Sortie: --/--/---- a --:--"));
    }
}
