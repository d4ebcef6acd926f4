use std::io::{self, Write};

use crossterm::{cursor, QueueableCommand};

/// Writes `msg` and puts the cursor back, so the next call overwrites it.
pub fn rewrite_message<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    out.queue(cursor::SavePosition)?;
    out.write_all(msg.as_bytes())?;
    out.queue(cursor::RestorePosition)?;
    out.flush()
}

pub fn photo_counter(done: usize, total: usize) -> String {
    format!("\t({} / {})          ", done, total)
}
