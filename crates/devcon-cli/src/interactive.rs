//! Terminal prompts.
//!
//! Uses dialoguer for confirmations; callers skip these with `--force`.

use std::path::Path;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

/// Ask before replacing an existing file. Defaults to "no".
pub fn confirm_overwrite(path: &Path) -> Result<bool> {
    eprintln!(
        "{}",
        style(format!("File {} already exists", path.display())).yellow()
    );
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Overwrite?")
        .default(false)
        .interact()?;
    Ok(confirmed)
}
