use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{AoaError, Result};

#[allow(async_fn_in_trait)]
pub trait Outlet {
    async fn save(&self, report: &str) -> Result<PathBuf>;
}

/// 把报告写入磁盘：先写同目录下的临时文件，再重命名覆盖目标文件
pub struct DiskOutlet {
    path: PathBuf,
}

impl DiskOutlet {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AoaError::output(&self.path, "output path has no file name"))?;
        let parent = self.path.parent().unwrap_or(Path::new("."));
        Ok(parent.join(format!(".{}.tmp", file_name)))
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, report: &str) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                AoaError::output(parent, format!("failed to create output directory: {}", e))
            })?;
        }

        let temp_path = self.temp_path()?;
        if let Err(e) = fs::write(&temp_path, report).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(AoaError::output(
                &self.path,
                format!("failed to write report: {}", e),
            ));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(AoaError::output(
                &self.path,
                format!("failed to move report into place: {}", e),
            ));
        }

        debug!(path = %self.path.display(), bytes = report.len(), "report saved");
        Ok(self.path.clone())
    }
}
