use crate::Command;
use anyhow::{Context, Result};
use itemsets_core::{calculate_checksum, extract_document, rewrite_envelope, ItemSetDocument};
use std::fs;
use std::path::Path;

pub(crate) fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Extract { envelope, compact } => {
            println!("{}", extract(&envelope, compact)?);
        }
        Command::Checksum { document } => {
            println!("{}", checksum(&document)?);
        }
        Command::Rewrite {
            envelope,
            document,
            output,
        } => {
            let target = output.unwrap_or_else(|| envelope.clone());
            rewrite(&envelope, &document, &target)?;
            println!("wrote {}", target.display());
        }
    }
    Ok(())
}

fn extract(envelope: &Path, compact: bool) -> Result<String> {
    let bytes = read(envelope)?;
    let document = extract_document(&bytes)
        .with_context(|| format!("failed to extract item sets from {}", envelope.display()))?;

    let text = if compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    Ok(text)
}

fn checksum(document: &Path) -> Result<String> {
    let document = read_document(document)?;
    let checksum = calculate_checksum(&document);
    Ok(format!("{} ({})", checksum.to_hex(), checksum.value()))
}

fn rewrite(envelope: &Path, document: &Path, target: &Path) -> Result<()> {
    let bytes = read(envelope)?;
    let document = read_document(document)?;
    let rewritten = rewrite_envelope(&bytes, &document)
        .with_context(|| format!("failed to rewrite item sets in {}", envelope.display()))?;

    fs::write(target, rewritten).with_context(|| format!("failed to write {}", target.display()))
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_document(path: &Path) -> Result<ItemSetDocument> {
    let bytes = read(path)?;
    ItemSetDocument::from_json_slice(&bytes)
        .with_context(|| format!("{} is not an item-set document", path.display()))
}
