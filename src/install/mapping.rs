//! Interactive field-mapping capture
//!
//! A line-prompt state machine that records which (table, field) pairs are
//! to be treated as encrypted. Generic over its input and output streams:
//! the binary wires in stdin/stdout, tests (and `--mappings FILE`) feed a
//! pre-validated script through the identical insert/finalize ordering.
//!
//! A failed insert is reported and the loop moves on — forward progress
//! over strict transactional correctness, by the installer's contract.
//! The terminating "no" triggers one `KR_New` call that registers the most
//! recently *entered* pair together with the captured key, finalizing
//! key-rotation setup.

use crate::db::Database;
use crate::error::Result;
use crate::prompt::{affirmative, negative};
use std::io::{BufRead, Write};
use tracing::warn;

/// Drive the mapping prompts until the operator declines to continue.
pub fn run<D, R, W>(db: &mut D, input: &mut R, out: &mut W) -> Result<()>
where
    D: Database + ?Sized,
    R: BufRead,
    W: Write,
{
    let existing = ask(input, out, "\tAlready using encrypted fields? ")?;
    let key = if affirmative(&existing) {
        ask(input, out, "Enter decryption key: ")?
    } else {
        String::new()
    };

    let backup = ask(input, out, "\tCreate backup first? ")?;
    if affirmative(&backup) {
        let sql = format!("CALL KR_BU_New(\"{}\")", db.sanitize(&key));
        if let Err(e) = db.query(&sql, true) {
            warn!(error = %e, "pre-mapping backup failed");
            writeln!(out, "Backup failed: {e}")?;
        }
    }

    // The terminating "no" carries the most recently entered pair out of
    // the loop; finalize registers it even if its insert failed
    let (table, field) = loop {
        let table = ask(input, out, "\tEnter table: ")?;
        let field = ask(input, out, "\tEnter field: ")?;

        let sql = format!(
            "INSERT INTO `sqlSec_map` (`tbl`,`field`) VALUES (\"{}\", \"{}\")",
            db.sanitize(&table),
            db.sanitize(&field)
        );
        if let Err(e) = db.query(&sql, true) {
            warn!(table = %table, field = %field, error = %e, "mapping insert failed");
            writeln!(out, "Failed to record {table} => {field}: {e}")?;
        }

        let another = ask(input, out, "\tAnother record? ")?;
        if negative(&another) {
            break (table, field);
        }
    };

    let sql = format!(
        "CALL KR_New(\"{}\", \"{}\", \"{}\")",
        db.sanitize(&table),
        db.sanitize(&field),
        db.sanitize(&key)
    );
    db.query(&sql, true)?;
    Ok(())
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> std::io::Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
