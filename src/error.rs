use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("Failed to read template file: {0}")]
    TemplateLoad(std::io::Error),

    #[error("Failed to parse template document: {0}")]
    TemplateParse(lopdf::Error),

    #[error("Malformed template: {message}")]
    InvalidTemplate { message: String },

    #[error("QR payload exceeds symbol capacity: {0}")]
    QrEncoding(#[from] qrcode::types::QrError),

    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image encoding failed: {0}")]
    Image(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CertificateError>;
