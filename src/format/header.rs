//! saltenc Header 实现
//!
//! 本模块实现 OpenSSL `enc` 容器格式的 Header：
//!
//!   offset 0..8   : ASCII "Salted__"
//!   offset 8..16  : 8 字节 salt
//!   offset 16..   : AES-256-CBC 密文
//!
//! Header 的职责仅限于：
//! - 标识文件类型（magic）
//! - 提供密钥派生所需的 salt
//!
//! 加密时写入一次，解密时读取一次；调用方显式给出 salt 时，
//! 输入被视为不带 Header，本模块不会被调用。

use std::io::{ErrorKind, Read, Write};

use crate::crypto::salt::{SALT_SIZE, Salt};
use crate::error::SaltencError;

/// OpenSSL 文件魔数（ASCII）
pub const MAGIC: &[u8; 8] = b"Salted__";

/// Header 固定大小
///
/// 8 (magic)
/// 8 (salt)
pub const HEADER_SIZE: usize = MAGIC.len() + SALT_SIZE;

/// Header 结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub salt: Salt,
}

impl Header {
    pub fn new(salt: Salt) -> Self {
        Self { salt }
    }

    /// 序列化为 16 字节：magic ‖ salt
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..MAGIC.len()].copy_from_slice(MAGIC);
        buf[MAGIC.len()..].copy_from_slice(self.salt.as_bytes());
        buf
    }

    /// 将 Header 写入输出流
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), SaltencError> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// 从输入流读取并解析 Header
    ///
    /// 恰好消费 16 字节；不足 16 字节或 magic 不匹配都视为格式错误，
    /// 短读不会重试。
    pub fn read<R: Read>(mut reader: R) -> Result<Self, SaltencError> {
        let mut buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => SaltencError::Format("input too short".into()),
            _ => SaltencError::Stream(e),
        })?;

        if &buf[..MAGIC.len()] != MAGIC {
            return Err(SaltencError::Format("missing \"Salted__\" magic".into()));
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&buf[MAGIC.len()..]);

        Ok(Self::new(Salt::new(salt)))
    }
}

/// 生成 16 字节 Header
pub fn write_header(salt: &Salt) -> [u8; HEADER_SIZE] {
    Header::new(*salt).to_bytes()
}

/// 读取 Header 并返回其中的 salt
pub fn read_header<R: Read>(reader: R) -> Result<Salt, SaltencError> {
    Header::read(reader).map(|header| header.salt)
}
