//! 流水线使用的分块缓冲区与读取器
//!
//! - `ChunkBuffer`：按最坏情况一次性分配 `chunk_size + BLOCK_SIZE`，
//!   并显式记录当前有效长度；整个运行期间复用，不按块重新分配
//! - `ChunkReader`：尽量读满一个块，并准确判断这次读取是否已到达输入末尾

use std::io::{ErrorKind, Read};

use zeroize::Zeroizing;

use crate::algorithm::BLOCK_SIZE;
use crate::error::SaltencError;

/// 可复用的分块缓冲区
///
/// 两种视图：
/// - 读取区：前 `chunk_size` 字节，用于接收输入
/// - 填充区：全部容量，加密末块填充后可能超出读取区一个分组
pub struct ChunkBuffer {
    data: Zeroizing<Vec<u8>>,
    chunk_size: usize,
    len: usize,
}

impl ChunkBuffer {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            data: Zeroizing::new(vec![0u8; chunk_size + BLOCK_SIZE]),
            chunk_size,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// 读取区，仅覆盖 `chunk_size` 字节
    pub fn read_area(&mut self) -> &mut [u8] {
        &mut self.data[..self.chunk_size]
    }

    /// 完整容量（含填充余量）
    pub fn full_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }

    /// 设置有效长度，不得超过容量
    pub fn set_len(&mut self, len: usize) -> Result<(), SaltencError> {
        if len > self.capacity() {
            return Err(SaltencError::Cipher(format!(
                "chunk length {len} exceeds buffer capacity {}",
                self.capacity()
            )));
        }
        self.len = len;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }
}

/// 按块读取输入，并精确识别 EOF
///
/// 读满一个块后再向前窥探一个字节：若已无数据，则本块就是最后一块；
/// 否则把窥探到的字节留给下一块。这样输入长度恰为块大小整数倍时，
/// 末块也能在同一轮被识别并填充，不会多出一轮空读。
pub struct ChunkReader<R> {
    inner: R,
    carry: Option<u8>,
    total: u64,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            carry: None,
            total: 0,
        }
    }

    /// 已读取的总字节数
    pub fn total(&self) -> u64 {
        self.total
    }

    /// 尽量填满 `buf`，返回 `(读取字节数, 是否到达末尾)`
    pub fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<(usize, bool)> {
        let mut filled = 0;

        if let Some(byte) = self.carry.take() {
            if buf.is_empty() {
                self.carry = Some(byte);
                return Ok((0, false));
            }
            buf[0] = byte;
            filled = 1;
        }

        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.total += filled as u64;
                    return Ok((filled, true));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        self.total += filled as u64;
        let at_eof = self.peek_eof()?;
        Ok((filled, at_eof))
    }

    fn peek_eof(&mut self) -> std::io::Result<bool> {
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(0) => return Ok(true),
                Ok(_) => {
                    // 预读字节计入下一块
                    self.carry = Some(probe[0]);
                    return Ok(false);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
