//! Local durable log
//!
//! Append-only JSON-line files, one per data domain, named by the
//! calendar day they were opened on. Writes are line-buffered so each
//! record reaches the OS as soon as its newline lands; `force_sync`
//! additionally pushes everything to stable storage. Files stay open for
//! the process lifetime, so rotation only happens across a restart.

use chrono::NaiveDate;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDomain {
    Environmental,
    Security,
}

impl LogDomain {
    fn as_str(self) -> &'static str {
        match self {
            LogDomain::Environmental => "environmental",
            LogDomain::Security => "security",
        }
    }
}

pub struct DataLog {
    environmental: LineWriter<File>,
    security: LineWriter<File>,
}

impl DataLog {
    /// Open both domain files for `day` under `dir`, creating the
    /// directory if needed.
    pub fn open(dir: impl AsRef<Path>, day: NaiveDate) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            environmental: open_domain(dir, day, LogDomain::Environmental)?,
            security: open_domain(dir, day, LogDomain::Security)?,
        })
    }

    /// Append one record as a JSON line.
    pub fn append<T: Serialize>(&mut self, domain: LogDomain, record: &T) -> anyhow::Result<()> {
        let line = serde_json::to_string(record)?;
        let writer = match domain {
            LogDomain::Environmental => &mut self.environmental,
            LogDomain::Security => &mut self.security,
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush both files and force the OS to persist them.
    pub fn force_sync(&mut self) -> anyhow::Result<()> {
        for writer in [&mut self.environmental, &mut self.security] {
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        Ok(())
    }
}

fn open_domain(dir: &Path, day: NaiveDate, domain: LogDomain) -> std::io::Result<LineWriter<File>> {
    let name = format!("{}_{}_data.txt", day.format("%Y%m%d"), domain.as_str());
    let file = OpenOptions::new().create(true).append(true).open(dir.join(name))?;
    Ok(LineWriter::new(file))
}
