use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use attestation::{ApplicantRecord, CertificateQuery, generate, logger};

/// Fill the attestation template with applicant data and a QR code.
#[derive(Parser, Debug)]
#[command(name = "attestation")]
#[command(about = "Fill the attestation template with applicant data and a QR code.", long_about = None)]
struct Args {
    #[arg(long, default_value = "")]
    firstname: String,
    #[arg(long, default_value = "")]
    lastname: String,
    /// Birth date, e.g. 1990-01-02
    #[arg(long, default_value = "")]
    birthday: String,
    #[arg(long, default_value = "")]
    birthtown: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    zipcode: String,
    /// Departure timestamp, e.g. 2021-04-16T14:05
    #[arg(long, default_value = "")]
    date: String,
    /// Comma-separated reason codes, e.g. "travail, sante"
    #[arg(long, default_value = "")]
    reasons: String,

    /// Path to the two-page attestation template
    #[arg(long, default_value = "public/certificate.pdf")]
    template: PathBuf,

    /// Directory the generated attestation is written into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

async fn run(args: Args) -> Result<()> {
    if !args.template.exists() {
        return Err(anyhow!("Template file not found: {:?}", args.template));
    }
    if !args.output_dir.is_dir() {
        return Err(anyhow!("Output path is not a directory: {:?}", args.output_dir));
    }

    let query = CertificateQuery {
        firstname: args.firstname,
        lastname: args.lastname,
        birthday: args.birthday,
        birthtown: args.birthtown,
        address: args.address,
        city: args.city,
        zipcode: args.zipcode,
        date: args.date,
        reasons: args.reasons,
    };
    let record = ApplicantRecord::from_query(&query);

    let certificate = generate(&record, &args.template, Local::now().naive_local())
        .await
        .context("Failed to generate attestation")?;

    let output_path = args.output_dir.join(&certificate.filename);
    fs::write(&output_path, &certificate.bytes)
        .with_context(|| format!("Failed to write {:?}", output_path))?;

    println!(
        "Saved {} ({} bytes)",
        output_path.display(),
        certificate.bytes.len()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
