use std::io::{self, Write};

use anyhow::Result;
use folio_core::FolioError;

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Writes the structured payload for library errors to stderr.
pub(super) fn report_error(operation: &str, path: Option<&str>, err: &anyhow::Error) {
    let Some(folio_err) = err.downcast_ref::<FolioError>() else {
        return;
    };
    let payload = folio_err.to_payload(operation, path.map(ToString::to_string));
    if let Ok(raw) = serde_json::to_string(&payload) {
        eprintln!("{raw}");
    }
}
