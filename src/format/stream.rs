//! saltenc Stream 实现
//!
//! 本模块负责 Header 之后“数据流（Stream）”部分的加密与解密。
//!
//! 职责范围：
//! - 将任意大小的输入按固定 chunk 读取，逐块经 CBC 变换后写出
//! - 仅在观察到输入末尾的那一块上做一次填充（加密）或去填充（解密）
//! - 链接状态由注入的 CBC 实现持有，在整个运行期间连续推进
//!
//! 设计前提与约束：
//! - chunk_size 必须是分组长度的正整数倍，保证非末块总是整块
//! - 解密时去填充失败即判定为密码错误或数据损坏（DecryptionError），
//!   这是唯一能发现密钥不匹配的位置
//! - 本模块不负责 Header、密钥派生、原子写入

use std::io::{ErrorKind, Read, Write};

use crate::algorithm::{BLOCK_SIZE, CbcDecrypt, CbcEncrypt};
use crate::error::SaltencError;
use crate::format::buffer::{ChunkBuffer, ChunkReader};
use crate::format::padding;

// 推荐的默认 chunk 大小：64 KiB
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// 一次运行的统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

fn check_chunk_size(chunk_size: usize) -> Result<(), SaltencError> {
    if chunk_size == 0 || chunk_size % BLOCK_SIZE != 0 {
        return Err(SaltencError::Cipher(format!(
            "chunk size {chunk_size} must be a positive multiple of {BLOCK_SIZE}"
        )));
    }
    Ok(())
}

/// 流式加密器
///
/// 负责将明文数据流按 chunk 加密并写入输出流。
pub struct StreamEncryptor<C> {
    cipher: C,
    chunk_size: usize,
}

impl<C: CbcEncrypt> StreamEncryptor<C> {
    /// 创建新的 StreamEncryptor
    ///
    /// - cipher: 已用 key / iv 初始化的 CBC 加密器
    /// - chunk_size: 每次读取的明文大小
    pub fn new(cipher: C, chunk_size: usize) -> Result<Self, SaltencError> {
        check_chunk_size(chunk_size)?;
        Ok(Self { cipher, chunk_size })
    }

    /// 从 reader 读取明文数据，加密后写入 writer
    pub fn encrypt<R: Read, W: Write>(
        &mut self,
        reader: R,
        mut writer: W,
    ) -> Result<StreamStats, SaltencError> {
        let mut reader = ChunkReader::new(reader);
        let mut buffer = ChunkBuffer::new(self.chunk_size);
        let mut stats = StreamStats::default();

        loop {
            // ---------- 读取 ----------
            let (read_len, at_eof) = reader.fill(buffer.read_area())?;

            // ---------- 末块填充 ----------
            let len = if at_eof {
                padding::pad(buffer.full_mut(), read_len, BLOCK_SIZE)?
            } else {
                read_len
            };
            buffer.set_len(len)?;

            // ---------- CBC 加密 ----------
            self.cipher.encrypt_blocks(buffer.as_mut_slice())?;

            // ---------- 写出 ----------
            writer.write_all(buffer.as_slice())?;

            stats.chunks += 1;
            stats.bytes_written += len as u64;

            if at_eof {
                break;
            }
        }

        stats.bytes_read = reader.total();
        log::debug!(
            "encrypted {} bytes into {} bytes over {} chunk(s)",
            stats.bytes_read,
            stats.bytes_written,
            stats.chunks
        );

        Ok(stats)
    }
}

/// 流式解密器
///
/// 负责从加密 stream 中读取数据并还原明文。
pub struct StreamDecryptor<C> {
    cipher: C,
    chunk_size: usize,
}

impl<C: CbcDecrypt> StreamDecryptor<C> {
    /// 创建新的 StreamDecryptor
    pub fn new(cipher: C, chunk_size: usize) -> Result<Self, SaltencError> {
        check_chunk_size(chunk_size)?;
        Ok(Self { cipher, chunk_size })
    }

    /// 从 reader 读取加密数据流，解密后写入 writer
    pub fn decrypt<R: Read, W: Write>(
        &mut self,
        reader: R,
        mut writer: W,
    ) -> Result<StreamStats, SaltencError> {
        let mut reader = ChunkReader::new(reader);
        let mut buffer = ChunkBuffer::new(self.chunk_size);
        let mut stats = StreamStats::default();

        loop {
            // ---------- 读取 ----------
            let (read_len, at_eof) = reader.fill(buffer.read_area())?;

            // 密文至少包含一个填充块，不能以空读结束
            if read_len == 0 {
                return Err(SaltencError::Stream(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "ciphertext ended without a final padded block",
                )));
            }
            buffer.set_len(read_len)?;

            // ---------- CBC 解密 ----------
            // 链接状态取自密文，与去填充是否成功无关
            self.cipher.decrypt_blocks(buffer.as_mut_slice())?;

            // ---------- 末块去填充 ----------
            let len = if at_eof {
                padding::unpad(buffer.as_slice(), read_len).map_err(|e| {
                    log::debug!("final block rejected: {e}");
                    SaltencError::Decryption
                })?
            } else {
                read_len
            };

            // ---------- 写出 ----------
            writer.write_all(&buffer.as_slice()[..len])?;

            stats.chunks += 1;
            stats.bytes_written += len as u64;

            if at_eof {
                break;
            }
        }

        stats.bytes_read = reader.total();
        log::debug!(
            "decrypted {} bytes into {} bytes over {} chunk(s)",
            stats.bytes_read,
            stats.bytes_written,
            stats.chunks
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;
    use crate::algorithm::aes_256_cbc::{Aes256CbcDec, Aes256CbcEnc};

    const KEY: [u8; 32] = [0x11; 32];
    const IV: [u8; 16] = [0x22; 16];

    fn encrypt_with(plain: &[u8], chunk_size: usize) -> (Vec<u8>, StreamStats) {
        let cipher = Aes256CbcEnc::new(&KEY, &IV).unwrap();
        let mut out = Vec::new();
        let stats = StreamEncryptor::new(cipher, chunk_size)
            .unwrap()
            .encrypt(Cursor::new(plain), &mut out)
            .unwrap();
        (out, stats)
    }

    fn decrypt_with(cipher_text: &[u8], chunk_size: usize) -> Result<Vec<u8>, SaltencError> {
        let cipher = Aes256CbcDec::new(&KEY, &IV).unwrap();
        let mut out = Vec::new();
        StreamDecryptor::new(cipher, chunk_size)?.decrypt(Cursor::new(cipher_text), &mut out)?;
        Ok(out)
    }

    /// 记录每次 CBC 调用的长度，用于检查填充只发生一次
    struct Recording {
        inner: Aes256CbcEnc,
        calls: Vec<usize>,
    }

    impl CbcEncrypt for Recording {
        fn encrypt_blocks(&mut self, blocks: &mut [u8]) -> Result<(), SaltencError> {
            self.calls.push(blocks.len());
            self.inner.encrypt_blocks(blocks)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn empty_input_yields_single_padding_block() {
        let (out, stats) = encrypt_with(b"", 64);
        assert_eq!(out.len(), BLOCK_SIZE);
        assert_eq!(stats.chunks, 1);
        assert_eq!(decrypt_with(&out, 64).unwrap(), b"");
    }

    #[test]
    fn block_aligned_input_gets_extra_block() {
        let (out, _) = encrypt_with(&[9u8; 32], 64);
        assert_eq!(out.len(), 48);
    }

    #[test]
    fn chunk_aligned_input_pads_on_last_chunk_without_extra_round() {
        let cipher = Recording {
            inner: Aes256CbcEnc::new(&KEY, &IV).unwrap(),
            calls: Vec::new(),
        };
        let mut enc = StreamEncryptor::new(cipher, 32).unwrap();
        let mut out = Vec::new();
        enc.encrypt(Cursor::new(vec![1u8; 64]), &mut out).unwrap();

        assert_eq!(enc.cipher.calls, vec![32, 48]);
        assert_eq!(out.len(), 80);
    }

    #[test]
    fn chunking_does_not_change_ciphertext() {
        let plain: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        let (a, _) = encrypt_with(&plain, 16);
        let (b, _) = encrypt_with(&plain, 64);
        let (c, _) = encrypt_with(&plain, DEFAULT_CHUNK_SIZE);
        assert_eq!(a, b);
        assert_eq!(b, c);

        assert_eq!(decrypt_with(&a, 16).unwrap(), plain);
        assert_eq!(decrypt_with(&a, 48).unwrap(), plain);
    }

    #[test]
    fn stats_count_bytes() {
        let (out, stats) = encrypt_with(&[0u8; 100], 32);
        assert_eq!(stats.bytes_read, 100);
        assert_eq!(stats.bytes_written, 112);
        assert_eq!(stats.chunks, 4);
        assert_eq!(out.len(), 112);
    }

    #[test]
    fn decrypt_of_empty_body_is_stream_error() {
        assert!(matches!(decrypt_with(b"", 64), Err(SaltencError::Stream(_))));
    }

    #[test]
    fn decrypt_of_unaligned_body_is_cipher_error() {
        let (mut out, _) = encrypt_with(b"hello", 64);
        out.pop();
        assert!(matches!(decrypt_with(&out, 64), Err(SaltencError::Cipher(_))));
    }

    #[test]
    fn tampered_padding_is_decryption_error() {
        // 翻转倒数第二个密文块的末字节，会确定性地破坏末块的填充字节
        let (mut out, _) = encrypt_with(b"hello world, sixteen+", 64);
        let idx = out.len() - BLOCK_SIZE - 1;
        out[idx] ^= 0x01;
        assert!(matches!(decrypt_with(&out, 64), Err(SaltencError::Decryption)));
    }

    #[test]
    fn read_error_aborts_run() {
        let cipher = Aes256CbcEnc::new(&KEY, &IV).unwrap();
        let mut out = Vec::new();
        let result = StreamEncryptor::new(cipher, 16)
            .unwrap()
            .encrypt(FailingReader, &mut out);
        assert!(matches!(result, Err(SaltencError::Stream(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_chunk_size_is_rejected() {
        let cipher = Aes256CbcEnc::new(&KEY, &IV).unwrap();
        assert!(StreamEncryptor::new(cipher, 0).is_err());
        let cipher = Aes256CbcDec::new(&KEY, &IV).unwrap();
        assert!(StreamDecryptor::new(cipher, 17).is_err());
    }
}
