// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write;

use vk_core::archive::{PASSWORD_PROPERTY, TITLE_PROPERTY};
use vk_core::Archive;

use super::{master_credentials, open_remote, open_session};
use crate::cli::OutputFormat;
use crate::error::Result;

const MASKED: &str = "********";

pub async fn run(descriptor: &str, output: OutputFormat) -> Result<()> {
    let master = master_credentials()?;
    let (_, client) = open_remote()?;

    let mut session = open_session(client, descriptor)?;
    let archive = session.load(&master).await?;

    print!("{}", format_archive(&archive, output)?);
    Ok(())
}

pub(crate) fn format_archive(archive: &Archive, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(archive)?)),
        OutputFormat::Text => Ok(format_text(archive)),
    }
}

/// Renders groups and entries, masking passwords.
fn format_text(archive: &Archive) -> String {
    let mut out = String::new();
    if archive.groups.is_empty() {
        out.push_str("(empty archive)\n");
        return out;
    }
    for group in &archive.groups {
        let _ = writeln!(out, "[{}] ({} entries)", group.title, group.entries.len());
        for entry in &group.entries {
            let _ = writeln!(out, "  {}", entry.title());
            for (name, value) in &entry.properties {
                if name == TITLE_PROPERTY {
                    continue;
                }
                let shown = if name == PASSWORD_PROPERTY {
                    MASKED
                } else {
                    value.as_str()
                };
                let _ = writeln!(out, "    {}: {}", name, shown);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
