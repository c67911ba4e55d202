//! 单次加解密运行的配置

use crate::algorithm::{BLOCK_SIZE, KdfDigest};
use crate::crypto::Salt;
use crate::error::SaltencError;
use crate::format::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// 显式 salt；为 None 时加密随机生成、解密从 Header 读取
    pub salt: Option<Salt>,
    /// KDF 摘要算法
    pub digest: KdfDigest,
    /// 每次读取的字节数
    pub chunk_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            salt: None,
            digest: KdfDigest::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Options {
    pub fn with_salt(mut self, salt: Salt) -> Self {
        self.salt = Some(salt);
        self
    }

    pub fn with_digest(mut self, digest: KdfDigest) -> Self {
        self.digest = digest;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn validate(&self) -> Result<(), SaltencError> {
        if self.chunk_size == 0 || self.chunk_size % BLOCK_SIZE != 0 {
            return Err(SaltencError::Cipher(format!(
                "chunk size {} must be a positive multiple of {BLOCK_SIZE}",
                self.chunk_size
            )));
        }
        Ok(())
    }
}
