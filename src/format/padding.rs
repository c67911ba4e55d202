//! PKCS#7 填充
//!
//! 填充长度 p = block_size - (data_len mod block_size)，始终在 [1, block_size]。
//! 数据恰好整块时也会追加一整块填充，保证填充总是存在、总是可去除。
//!
//! 去填充采用严格校验：计数为 0、超过数据长度、或任一填充字节不等于计数，
//! 都返回 PaddingError，绝不把非法填充当作“零字节填充”放过。

use crate::error::SaltencError;

/// 在 `buffer[..data_len]` 之后写入填充，返回填充后的总长度
///
/// `buffer` 的容量必须能容纳填充后的数据。
pub fn pad(buffer: &mut [u8], data_len: usize, block_size: usize) -> Result<usize, SaltencError> {
    if block_size == 0 || block_size > u8::MAX as usize {
        return Err(SaltencError::Padding("block size out of range"));
    }

    let pad_len = block_size - data_len % block_size;
    let new_len = data_len
        .checked_add(pad_len)
        .ok_or(SaltencError::Padding("length overflow"))?;

    if new_len > buffer.len() {
        return Err(SaltencError::Padding("buffer too small for padding"));
    }

    buffer[data_len..new_len].fill(pad_len as u8);
    Ok(new_len)
}

/// 校验并去除 `buffer[..data_len]` 末尾的填充，返回去填充后的长度
pub fn unpad(buffer: &[u8], data_len: usize) -> Result<usize, SaltencError> {
    if data_len == 0 || data_len > buffer.len() {
        return Err(SaltencError::Padding("no data to unpad"));
    }

    let data = &buffer[..data_len];
    let pad_len = data[data_len - 1] as usize;

    if pad_len == 0 || pad_len > data_len {
        return Err(SaltencError::Padding("bad padding length"));
    }

    // 不提前退出，避免按字节位置泄露比较结果
    let mismatch = data[data_len - pad_len..]
        .iter()
        .fold(0u8, |acc, &b| acc | (b ^ pad_len as u8));
    if mismatch != 0 {
        return Err(SaltencError::Padding("bad padding bytes"));
    }

    Ok(data_len - pad_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BS: usize = 16;

    #[test]
    fn pad_appends_between_one_and_block_size() {
        for len in 0..=48 {
            let mut buf = vec![0xaau8; len + BS];
            let new_len = pad(&mut buf, len, BS).unwrap();
            let added = new_len - len;

            assert!((1..=BS).contains(&added), "len {len} added {added}");
            assert_eq!(new_len % BS, 0);
            assert!(buf[len..new_len].iter().all(|&b| b as usize == added));
        }
    }

    #[test]
    fn full_block_of_padding_on_aligned_input() {
        let mut buf = [0u8; 32];
        assert_eq!(pad(&mut buf, 16, BS).unwrap(), 32);
        assert_eq!(&buf[16..], &[16u8; 16]);

        let mut empty = [0u8; 16];
        assert_eq!(pad(&mut empty, 0, BS).unwrap(), 16);
        assert_eq!(empty, [16u8; 16]);
    }

    #[test]
    fn pad_then_unpad_restores_length() {
        for len in 0..=40 {
            let mut buf: Vec<u8> = (0..len as u8).chain(std::iter::repeat_n(0, BS)).collect();
            let padded = pad(&mut buf, len, BS).unwrap();
            assert_eq!(unpad(&buf, padded).unwrap(), len);
            assert_eq!(buf[..len], (0..len as u8).collect::<Vec<_>>()[..]);
        }
    }

    #[test]
    fn pad_fails_without_capacity() {
        let mut buf = [0u8; 20];
        assert!(matches!(pad(&mut buf, 16, BS), Err(SaltencError::Padding(_))));
    }

    #[test]
    fn pad_rejects_bad_block_size() {
        let mut buf = [0u8; 300];
        assert!(pad(&mut buf, 3, 0).is_err());
        assert!(pad(&mut buf, 3, 256).is_err());
    }

    #[test]
    fn unpad_rejects_zero_count() {
        let buf = [1u8, 2, 3, 0];
        assert!(matches!(unpad(&buf, 4), Err(SaltencError::Padding(_))));
    }

    #[test]
    fn unpad_rejects_count_beyond_data() {
        let buf = [5u8, 5, 5];
        assert!(matches!(unpad(&buf, 3), Err(SaltencError::Padding(_))));
    }

    #[test]
    fn unpad_rejects_inconsistent_bytes() {
        let buf = [b'a', 3, 2, 3];
        assert!(matches!(unpad(&buf, 4), Err(SaltencError::Padding(_))));
    }

    #[test]
    fn unpad_rejects_empty() {
        assert!(matches!(unpad(&[], 0), Err(SaltencError::Padding(_))));
        assert!(matches!(unpad(&[1u8], 2), Err(SaltencError::Padding(_))));
    }
}
