//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use dobverify_store_lmdb::LmdbEnvironment;
use dobverify_types::{NewSubmission, VerificationResult};
use dobverify_utils::{format_elapsed, VerdictTally};
use dobverify_verification::{
    record_certificate, submit_and_verify, verify_batch, VerificationOutcome, VerificationService,
};

use crate::config::AppConfig;

/// One entry of a batch file.
#[derive(Debug, Deserialize)]
pub struct BatchEntry {
    pub name: String,
    pub date_of_birth: String,
    pub dob_cert: String,
}

fn build_service(config: &AppConfig) -> anyhow::Result<VerificationService> {
    let source = config.text_source.build()?;
    Ok(VerificationService::from_config(
        source,
        &config.extraction,
        &config.scoring,
    )?)
}

fn open_store(config: &AppConfig) -> anyhow::Result<LmdbEnvironment> {
    LmdbEnvironment::open_default(&config.data_dir)
        .with_context(|| format!("opening database in {}", config.data_dir.display()))
}

/// Ask for a value on stdin unless it was given on the command line.
fn prompt_if_missing(
    value: Option<String>,
    label: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    write!(output, "{label}: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn describe(result: &VerificationResult) -> String {
    match result.accuracy {
        Some(accuracy) => format!("{} (accuracy {accuracy:.0}%)", result.verdict),
        None => format!("{} (no date found in certificate)", result.verdict),
    }
}

fn report(outcome: &VerificationOutcome) -> String {
    let extracted = match &outcome.report.extracted.normalized_value {
        Some(date) => format!("{date} from {:?}", outcome.report.extracted.raw_text),
        None => "none".to_string(),
    };
    format!(
        "user {}: {}, certificate date {extracted}, {}",
        outcome.submission.user_id,
        describe(&outcome.report.result),
        format_elapsed(outcome.elapsed),
    )
}

pub fn verify(
    config: &AppConfig,
    name: Option<String>,
    date_of_birth: Option<String>,
    dob_cert: Option<String>,
) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let name = prompt_if_missing(name, "Name", &mut input, &mut output)?;
    let date_of_birth = prompt_if_missing(date_of_birth, "Date of birth", &mut input, &mut output)?;
    let dob_cert = prompt_if_missing(dob_cert, "Birth certificate", &mut input, &mut output)?;
    let draft = NewSubmission::new(name, date_of_birth, dob_cert)?;

    let service = build_service(config)?;
    let env = open_store(config)?;
    let outcome = submit_and_verify(&env.record_store(), &service, &draft)?;
    if !outcome.inserted {
        println!(
            "already submitted as user {}, verifying stored record",
            outcome.submission.user_id
        );
    }
    record_certificate(&env.certificate_store(), &outcome)?;

    println!("{}", report(&outcome));
    Ok(())
}

/// Parse a batch file body. Entries that fail validation are returned as
/// errors in place so the caller can count them.
pub fn parse_batch(json: &str) -> anyhow::Result<Vec<Result<NewSubmission, String>>> {
    let entries: Vec<BatchEntry> = serde_json::from_str(json).context("parsing batch file")?;
    Ok(entries
        .into_iter()
        .map(|e| {
            NewSubmission::new(&e.name, &e.date_of_birth, &e.dob_cert)
                .map_err(|err| format!("{:?}: {err}", e.name))
        })
        .collect())
}

pub fn batch(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading batch file {}", file.display()))?;
    let parsed = parse_batch(&json)?;

    let tally = VerdictTally::new();
    let mut drafts = Vec::with_capacity(parsed.len());
    for entry in parsed {
        match entry {
            Ok(draft) => drafts.push(draft),
            Err(reason) => {
                tally.record_rejected();
                println!("rejected {reason}");
            }
        }
    }

    let service = build_service(config)?;
    let env = open_store(config)?;
    let certificates = env.certificate_store();
    for (draft, result) in drafts
        .iter()
        .zip(verify_batch(&env.record_store(), &service, &drafts))
    {
        let outcome = result.with_context(|| format!("verifying {}", draft.key()))?;
        record_certificate(&certificates, &outcome)?;
        tally.record(outcome.report.result.verdict);
        println!("{}", report(&outcome));
    }

    tracing::info!(summary = %tally.summary(), "batch complete");
    println!("{}", tally.summary());
    Ok(())
}

pub fn extract(config: &AppConfig, dob_cert: &str) -> anyhow::Result<()> {
    let service = build_service(config)?;
    let extracted = service.extractor().extract(dob_cert);
    match extracted.normalized_value {
        Some(date) => println!("{date} ({:?})", extracted.raw_text),
        None => println!("no date found"),
    }
    Ok(())
}
