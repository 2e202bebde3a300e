//! Memory control files: `memory.low` and `memory.max`.

use std::path::Path;

use mini_container_common::error::{ContainerError, Result};

/// The reclaim protection threshold paired with a hard limit: the kernel
/// tries not to reclaim below 75% of the allowed maximum.
#[must_use]
pub fn low_watermark(max_ram_bytes: u64) -> u64 {
    max_ram_bytes * 75 / 100
}

/// Writes the `memory.low` protection value as a decimal byte count.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn set_memory_low(cgroup_path: &Path, bytes: u64) -> Result<()> {
    write_control(cgroup_path, "memory.low", bytes)
}

/// Writes the `memory.max` hard limit as a decimal byte count.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn set_memory_max(cgroup_path: &Path, bytes: u64) -> Result<()> {
    write_control(cgroup_path, "memory.max", bytes)
}

fn write_control(cgroup_path: &Path, file: &str, bytes: u64) -> Result<()> {
    let path = cgroup_path.join(file);
    std::fs::write(&path, bytes.to_string()).map_err(|e| ContainerError::Io {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes, "memory limit written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_watermark_is_three_quarters_truncated() {
        assert_eq!(low_watermark(67_108_864), 50_331_648);
        assert_eq!(low_watermark(100), 75);
        assert_eq!(low_watermark(7), 5);
        assert_eq!(low_watermark(0), 0);
    }
}
