use diskcache::DiskCache;
use eyre::{bail, eyre, WrapErr};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn get(cache: &DiskCache, key: &str, output: Option<&Path>) -> eyre::Result<()> {
    let Some(bytes) = cache.get(key) else {
        bail!("no entry for key '{key}'");
    };

    match output {
        Some(path) => fs::write(path, &bytes)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    tracing::debug!(key, bytes = bytes.len(), "read entry");
    Ok(())
}

pub fn set(
    cache: &DiskCache,
    key: &str,
    value: Option<&str>,
    file: Option<&Path>,
) -> eyre::Result<()> {
    if key.is_empty() {
        bail!("key must not be empty");
    }

    let bytes = match (value, file) {
        (Some(value), _) => value.as_bytes().to_vec(),
        (None, Some(path)) => {
            fs::read(path).wrap_err_with(|| format!("failed to read {}", path.display()))?
        }
        (None, None) => bail!("either --value or --file is required"),
    };

    cache.set(key, &bytes);

    // Writes never report failure, so confirm the entry landed
    if !cache.contains(key) {
        bail!("failed to store entry for key '{key}'");
    }
    tracing::info!("✓ Stored {} bytes", bytes.len());
    Ok(())
}

pub fn remove(cache: &DiskCache, key: &str) -> eyre::Result<()> {
    if key.is_empty() {
        bail!("key must not be empty");
    }
    cache.remove(key);
    tracing::info!("✓ Removed '{key}'");
    Ok(())
}

pub fn path(cache: &DiskCache, key: &str) -> eyre::Result<()> {
    let path = cache
        .file_path(key)
        .ok_or_else(|| eyre!("key must not be empty"))?;
    println!("{}", path.display());
    Ok(())
}
