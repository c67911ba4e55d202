//! saltenc 原子写入工具。
//!
//! 提供「先写临时文件，成功后再替换目标文件」的写出语义。
//! 加解密中途失败时，残缺输出必须视为无效：临时文件会被删除，
//! 目标文件保持原状。

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SaltencError;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 原子写文件。
///
/// 流程：
/// 1. 在目标目录创建临时文件；
/// 2. 调用 `write_fn` 写入完整内容；
/// 3. 写入成功后，使用 rename 替换目标文件。
pub fn write_atomic<T, F>(target: &Path, write_fn: F) -> Result<T, SaltencError>
where
    F: FnOnce(&mut File) -> Result<T, SaltencError>,
{
    let parent = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&parent)?;

    let tmp_path = build_tmp_path(&parent, target.file_name());
    let mut tmp_file = File::create(&tmp_path)?;

    let value = match write_fn(&mut tmp_file).and_then(|value| {
        tmp_file.sync_all()?;
        Ok(value)
    }) {
        Ok(value) => value,
        Err(err) => {
            drop(tmp_file);
            let _ = fs::remove_file(&tmp_path);
            log::debug!("removed partial output {}", tmp_path.display());
            return Err(err);
        }
    };
    drop(tmp_file);

    if let Err(err) = fs::rename(&tmp_path, target) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }

    Ok(value)
}

fn build_tmp_path(parent: &Path, file_name: Option<&std::ffi::OsStr>) -> PathBuf {
    let base_name = file_name
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("saltenc-output");

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);

    parent.join(format!(
        ".{base_name}.tmp-{}-{timestamp}-{counter}",
        std::process::id()
    ))
}
