//! saltenc 算法模块。
//!
//! 统一管理 KDF 摘要选择与 CBC 分组能力接口，具体实现见子模块。
//!
//! 流水线只依赖 `CbcEncrypt` / `CbcDecrypt` 两个能力接口，
//! 由调用方在构造时显式注入，不存在进程级的算法注册表。

pub mod aes_256_cbc;

use std::fmt;
use std::str::FromStr;

use crate::error::SaltencError;

/// AES 分组长度（字节）
pub const BLOCK_SIZE: usize = 16;

/// CBC 加密能力
///
/// 实现者持有链接状态（上一个密文块），每处理一个块即推进。
pub trait CbcEncrypt {
    /// 原地加密 `blocks`，长度必须是 `BLOCK_SIZE` 的整数倍
    fn encrypt_blocks(&mut self, blocks: &mut [u8]) -> Result<(), SaltencError>;
}

/// CBC 解密能力
///
/// 链接状态取自密文本身，与明文是否有效无关。
pub trait CbcDecrypt {
    /// 原地解密 `blocks`，长度必须是 `BLOCK_SIZE` 的整数倍
    fn decrypt_blocks(&mut self, blocks: &mut [u8]) -> Result<(), SaltencError>;
}

/// 旧格式 KDF 可选的摘要算法。
///
/// `Md5` 为旧版 `openssl enc` 的默认值；OpenSSL 1.1 起默认改为 `Sha256`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KdfDigest {
    #[default]
    Md5,
    Sha256,
}

impl KdfDigest {
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for KdfDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KdfDigest {
    type Err = SaltencError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(SaltencError::KeyDerivation(format!(
                "unsupported digest: {other}"
            ))),
        }
    }
}
