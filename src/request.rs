//! Request and response shapes for the external trigger boundary.
//!
//! The trigger hands us a flat set of string query parameters and expects
//! a status/headers/body envelope back with the PDF base64-encoded. Both
//! shapes are plain serde types; no HTTP plumbing lives here.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::certificate::RenderedCertificate;
use crate::format::{parse_date, parse_datetime};

/// Raw query parameters as received from the trigger.
/// Every field defaults to the empty string when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CertificateQuery {
    pub firstname: String,
    pub lastname: String,
    pub birthday: String,
    pub birthtown: String,
    pub address: String,
    pub city: String,
    pub zipcode: String,
    pub date: String,
    pub reasons: String,
}

/// Parsed per-request applicant data. Immutable once constructed.
///
/// Unparsable dates become `None` and render as placeholder text
/// downstream; they never abort the request.
#[derive(Debug, Clone)]
pub struct ApplicantRecord {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_town: String,
    pub address: String,
    pub zip_code: String,
    pub city: String,
    pub departure: Option<NaiveDateTime>,
    /// Raw comma-separated reasons text, kept verbatim for the QR payload.
    pub reasons: String,
}

impl ApplicantRecord {
    pub fn from_query(query: &CertificateQuery) -> Self {
        Self {
            first_name: query.firstname.clone(),
            last_name: query.lastname.clone(),
            birth_date: parse_date(&query.birthday),
            birth_town: query.birthtown.clone(),
            address: query.address.clone(),
            zip_code: query.zipcode.clone(),
            city: query.city.clone(),
            departure: parse_datetime(&query.date),
            reasons: query.reasons.clone(),
        }
    }

    /// Trimmed reason-code tokens, in the order the caller supplied them.
    pub fn reason_codes(&self) -> impl Iterator<Item = &str> {
        self.reasons
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn full_address(&self) -> String {
        format!("{} {} {}", self.address, self.zip_code, self.city)
    }
}

/// Response envelope handed back to the trigger.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status: u16,
    pub is_base64_encoded: bool,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn from_certificate(certificate: &RenderedCertificate) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/pdf".to_string());
        headers.insert(
            "Content-Disposition".to_string(),
            format!("attachment; filename=\"{}\"", certificate.filename),
        );

        Self {
            status: 200,
            is_base64_encoded: true,
            headers,
            body: general_purpose::STANDARD.encode(&certificate.bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_empty_strings() {
        let query: CertificateQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.firstname, "");
        assert_eq!(query.reasons, "");
    }

    #[test]
    fn test_record_parses_dates() {
        let query = CertificateQuery {
            birthday: "1990-01-02".to_string(),
            date: "2021-04-16T14:05:00".to_string(),
            ..Default::default()
        };
        let record = ApplicantRecord::from_query(&query);
        assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(1990, 1, 2));
        assert_eq!(
            record.departure,
            NaiveDate::from_ymd_opt(2021, 4, 16).and_then(|d| d.and_hms_opt(14, 5, 0))
        );
    }

    #[test]
    fn test_record_keeps_unparsable_dates_as_none() {
        let query = CertificateQuery {
            birthday: "soon".to_string(),
            date: "later".to_string(),
            ..Default::default()
        };
        let record = ApplicantRecord::from_query(&query);
        assert!(record.birth_date.is_none());
        assert!(record.departure.is_none());
    }

    #[test]
    fn test_reason_codes_are_trimmed_in_order() {
        let query = CertificateQuery {
            reasons: "travail, sante ,,  famille".to_string(),
            ..Default::default()
        };
        let record = ApplicantRecord::from_query(&query);
        let codes: Vec<&str> = record.reason_codes().collect();
        assert_eq!(codes, vec!["travail", "sante", "famille"]);
    }

    #[test]
    fn test_response_envelope() {
        let certificate = RenderedCertificate {
            bytes: b"%PDF-1.5 fake".to_vec(),
            filename: "attestation-2021-16-04-14-05.pdf".to_string(),
        };
        let response = HttpResponse::from_certificate(&certificate);
        assert_eq!(response.status, 200);
        assert!(response.is_base64_encoded);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/pdf")
        );
        assert_eq!(
            response.headers.get("Content-Disposition").map(String::as_str),
            Some("attachment; filename=\"attestation-2021-16-04-14-05.pdf\"")
        );
        let decoded = general_purpose::STANDARD.decode(&response.body).unwrap();
        assert_eq!(decoded, certificate.bytes);
    }
}
