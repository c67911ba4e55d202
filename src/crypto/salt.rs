//! saltenc salt 处理
//!
//! 旧格式固定使用 8 字节 salt，来源只有三种：
//! - 调用方给出的 16 位十六进制字面量
//! - 加密时由系统安全随机源生成
//! - 解密时从 Header 中读取

use std::fmt;
use std::str::FromStr;

use rand::{RngCore, rngs::OsRng};

use crate::error::SaltencError;

/// salt 长度（字节）
pub const SALT_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    pub fn new(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// 生成随机 salt
    ///
    /// 随机源无法提供足够字节时必须报错，不能退化为弱 salt。
    pub fn generate() -> Result<Self, SaltencError> {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| SaltencError::Random)?;
        Ok(Self(bytes))
    }

    /// 从恰好 16 个十六进制字符解析 salt
    pub fn from_hex(text: &str) -> Result<Self, SaltencError> {
        if text.len() != SALT_SIZE * 2 {
            return Err(SaltencError::Salt(format!(
                "expected {} hex characters, got {}",
                SALT_SIZE * 2,
                text.len()
            )));
        }

        let mut bytes = [0u8; SALT_SIZE];
        hex::decode_to_slice(text, &mut bytes)
            .map_err(|e| SaltencError::Salt(e.to_string()))?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

impl FromStr for Salt {
    type Err = SaltencError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// 与 `openssl enc -p` 一致，输出大写十六进制
impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_literal() {
        let salt = Salt::from_hex("0123456789abcdef").unwrap();
        assert_eq!(
            salt.as_bytes(),
            &[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]
        );
        assert_eq!(salt.to_string(), "0123456789ABCDEF");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(Salt::from_hex("0123"), Err(SaltencError::Salt(_))));
        assert!(matches!(
            Salt::from_hex("0123456789abcdef00"),
            Err(SaltencError::Salt(_))
        ));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            Salt::from_hex("0123456789abcdeg"),
            Err(SaltencError::Salt(_))
        ));
    }

    #[test]
    fn generated_salts_differ() {
        let a = Salt::generate().unwrap();
        let b = Salt::generate().unwrap();
        assert_ne!(a, b);
    }
}
