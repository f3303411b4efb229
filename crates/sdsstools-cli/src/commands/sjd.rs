//! Print the SJD.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sdsstools_core::time::get_sjd;

pub async fn execute(observatory: Option<&str>, date: Option<NaiveDateTime>, strict: bool) -> Result<()> {
    let sjd = get_sjd(observatory, date, strict).context("Cannot compute the SJD")?;
    println!("{}", sjd);
    Ok(())
}
