//! JSON manifest of a run, for tooling that wants the outcomes without
//! scraping the HTML

use crate::error::Result;
use crate::report::ReportDocument;
use std::io::Write;

pub fn write<W: Write>(writer: &mut W, document: &ReportDocument) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, document)?;
    writeln!(writer)?;
    Ok(())
}
