use std::path::Path;

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};

use crate::descriptor::reflect::DescriptorSet;

/// Memory-mapped `FileDescriptorSet` on disk.
pub struct DescriptorSetLoader {
  file: AsyncMmapFile,
}

impl DescriptorSetLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open descriptor set '{}'", path.display()))?;
    Ok(Self { file })
  }

  pub fn decode(&self) -> anyhow::Result<DescriptorSet> {
    DescriptorSet::decode(self.file.as_slice())
  }
}
