use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use stream_metadata::{ExportMap, Milestone, StreamMetadata};

use super::config::{Effective, OutputFormat};
use super::error::InspectError;

/// Counts reported once the input is exhausted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub violations: usize,
    pub skipped: usize,
}

// ═══════════════════════════════════════════════════════════════
//  Main dispatch
// ═══════════════════════════════════════════════════════════════

pub fn run(args: &Effective) -> Result<Summary, InspectError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.input == "-" {
        let stdin = io::stdin();
        inspect(args, stdin.lock(), &mut out)
    } else {
        let file = File::open(&args.input).map_err(|source| InspectError::Input {
            path: args.input.clone(),
            source,
        })?;
        inspect(args, BufReader::new(file), &mut out)
    }
}

/// Read exported records line by line, check them and print each one.
///
/// Only reader and writer I/O failures end a lenient run; undecodable or
/// malformed lines are skipped and counted.
pub fn inspect<R: BufRead, W: Write>(
    args: &Effective,
    input: R,
    out: &mut W,
) -> Result<Summary, InspectError> {
    let mut summary = Summary::default();

    for (idx, raw) in input.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        let line = match String::from_utf8(raw) {
            Ok(l) => l,
            Err(source) if args.strict => return Err(InspectError::Encoding { line: line_no, source }),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping undecodable line");
                summary.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let record = match parse_record(&line) {
            Ok(r) => r,
            Err(source) if args.strict => return Err(InspectError::Record { line: line_no, source }),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed record");
                summary.skipped += 1;
                continue;
            }
        };

        if let Err(e) = record.check_ordering() {
            if args.strict {
                return Err(InspectError::Record { line: line_no, source: e });
            }
            tracing::warn!(line = line_no, stream_id = record.stream_id, error = %e, "ordering violation");
            summary.violations += 1;
        }

        match args.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &record.export())
                    .map_err(|e| InspectError::Io(e.into()))?;
                writeln!(out)?;
            }
            OutputFormat::Table => write_table(out, &record, args.relative)?,
        }
        summary.records += 1;
    }

    tracing::info!(
        records = summary.records,
        violations = summary.violations,
        skipped = summary.skipped,
        "inspection complete"
    );
    Ok(summary)
}

fn parse_record(line: &str) -> Result<StreamMetadata, stream_metadata::MetadataError> {
    let export = ExportMap::from_json_str(line)?;
    StreamMetadata::from_export(&export)
}

fn write_table<W: Write>(out: &mut W, record: &StreamMetadata, relative: bool) -> io::Result<()> {
    let version = if record.version.is_empty() { "?" } else { &record.version };
    writeln!(
        out,
        "stream {} ({version}) {}:{} cellular={} proxy={}",
        record.stream_id, record.host_address, record.host_port, record.cellular, record.via_proxy
    )?;
    writeln!(
        out,
        "  tx={} rx={} latency={}ms connected={}ms blocked={}ms",
        record.tx_bytes, record.rx_bytes, record.latency_ms, record.connected_ms, record.blocked_ms
    )?;
    for milestone in Milestone::ALL {
        let cell = if !record.is_recorded(milestone) {
            "-".to_string()
        } else if let Some(delta) = record.since_connected(milestone).filter(|_| relative) {
            format!("+{delta:.6}")
        } else {
            // Absolute reading; also used when there is no connect time to offset from.
            format!("{:.6}", record.time(milestone))
        };
        writeln!(out, "  {:<28}{cell}", milestone.key())?;
    }
    Ok(())
}
