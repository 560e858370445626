use diskcache::DiskCache;
use eyre::WrapErr;

pub fn clear(cache: &DiskCache) -> eyre::Result<()> {
    cache
        .remove_all()
        .wrap_err_with(|| format!("failed to clear {}", cache.root().display()))?;
    tracing::info!("✓ Cache cleared successfully");
    Ok(())
}

pub fn count(cache: &DiskCache) -> eyre::Result<()> {
    println!("{}", cache.count());
    Ok(())
}

pub fn stats(cache: &DiskCache) -> eyre::Result<()> {
    let last_sweep = cache
        .last_sweep()
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    println!("root: {}", cache.root().display());
    println!("entries: {}", cache.count());
    println!("size: {} bytes", cache.total_size());
    println!("allocated: {} bytes", cache.total_allocated_size());
    println!("size limit: {} bytes", cache.config().size_limit);
    println!("last sweep: {last_sweep}");
    Ok(())
}

pub async fn sweep(cache: DiskCache) -> eyre::Result<()> {
    let report = tokio::task::spawn_blocking(move || cache.sweep()).await??;

    println!(
        "scanned {} entries ({} bytes), evicted {} ({} bytes), {} bytes remaining",
        report.scanned,
        report.total_bytes,
        report.evicted,
        report.evicted_bytes,
        report.remaining_bytes
    );
    if report.stale_temp_removed > 0 {
        tracing::info!("Removed {} stale temporary files", report.stale_temp_removed);
    }
    if report.trash_removed > 0 {
        tracing::info!("Removed {} leftover cache trees", report.trash_removed);
    }
    Ok(())
}
