use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::args::Cli;
use usercheck_lib::{Endpoint, ErrorCode, MessageCatalog, VerificationOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    pub value: String,
    pub endpoint: &'static str,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OutputRow {
    pub fn new(
        value: impl Into<String>,
        endpoint: Endpoint,
        outcome: VerificationOutcome,
        catalog: &MessageCatalog,
        attribute: &str,
    ) -> Self {
        let error_code = outcome.error_code();
        Self {
            value: value.into(),
            endpoint: endpoint.as_str(),
            is_valid: outcome.is_valid(),
            error_code,
            message: error_code.map(|code| catalog.for_error_code(code, attribute)),
        }
    }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_invalid(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| !row.is_valid)
}

fn write_human(rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        if row.is_valid {
            println!("[OK]      {}", row.value);
        } else {
            println!(
                "[INVALID] {} :: {} ({})",
                row.value,
                row.error_code.map(ErrorCode::as_str).unwrap_or("unknown"),
                row.message.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv requires the 'with-csv' feature")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> [&str; 5] {
    // colonnes stables : value, endpoint, is_valid, error_code, message
    [
        row.value.as_str(),
        row.endpoint,
        if row.is_valid { "true" } else { "false" },
        row.error_code.map(ErrorCode::as_str).unwrap_or(""),
        row.message.as_deref().unwrap_or(""),
    ]
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
