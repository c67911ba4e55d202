//! saltenc AES-256-CBC 分组加解密实现

use aes::Aes256;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::algorithm::{BLOCK_SIZE, CbcDecrypt, CbcEncrypt};
use crate::error::SaltencError;

pub const KEY_SIZE: usize = 32;
pub const IV_SIZE: usize = 16;

/// AES-256-CBC 加密器，内部持有链接状态
pub struct Aes256CbcEnc {
    inner: cbc::Encryptor<Aes256>,
}

impl Aes256CbcEnc {
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, SaltencError> {
        let inner = cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| SaltencError::Cipher("invalid key or iv length".into()))?;
        Ok(Self { inner })
    }
}

impl CbcEncrypt for Aes256CbcEnc {
    fn encrypt_blocks(&mut self, blocks: &mut [u8]) -> Result<(), SaltencError> {
        check_aligned(blocks.len())?;
        for block in blocks.chunks_exact_mut(BLOCK_SIZE) {
            self.inner
                .encrypt_block_mut(aes::Block::from_mut_slice(block));
        }
        Ok(())
    }
}

/// AES-256-CBC 解密器，内部持有链接状态
pub struct Aes256CbcDec {
    inner: cbc::Decryptor<Aes256>,
}

impl Aes256CbcDec {
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, SaltencError> {
        let inner = cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| SaltencError::Cipher("invalid key or iv length".into()))?;
        Ok(Self { inner })
    }
}

impl CbcDecrypt for Aes256CbcDec {
    fn decrypt_blocks(&mut self, blocks: &mut [u8]) -> Result<(), SaltencError> {
        check_aligned(blocks.len())?;
        for block in blocks.chunks_exact_mut(BLOCK_SIZE) {
            self.inner
                .decrypt_block_mut(aes::Block::from_mut_slice(block));
        }
        Ok(())
    }
}

fn check_aligned(len: usize) -> Result<(), SaltencError> {
    if len % BLOCK_SIZE != 0 {
        return Err(SaltencError::Cipher(format!(
            "data length {len} is not a multiple of the block size"
        )));
    }
    Ok(())
}
