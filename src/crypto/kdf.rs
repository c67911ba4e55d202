//! saltenc 密钥派生函数（KDF）模块
//!
//! 本模块复现 OpenSSL `EVP_BytesToKey` 的派生方式（PKCS#5 v1 的变体）：
//!
//!   D_1 = H^n(passphrase ‖ salt)
//!   D_i = H^n(D_{i-1} ‖ passphrase ‖ salt)
//!
//! 依次拼接 D_1, D_2, ... 直到凑满 48 字节，最后一段按需截断。
//! 前 32 字节为 AES-256 key，后 16 字节为 CBC IV。
//!
//! 注意：
//! - 旧格式固定为 1 轮摘要 + 8 字节 salt，强度很弱，但必须原样保留才能互通
//! - 派生结果在离开作用域后自动清零

use std::fmt;

use md5::{Digest, Md5};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::algorithm::KdfDigest;
use crate::algorithm::aes_256_cbc::{IV_SIZE, KEY_SIZE};
use crate::crypto::salt::Salt;
use crate::error::SaltencError;

/// 派生材料总长度：key ‖ iv
pub const KEY_IV_LEN: usize = KEY_SIZE + IV_SIZE;

/// `openssl enc` 默认只做一轮摘要
pub const OPENSSL_ROUNDS: u32 = 1;

/// 派生出的 key 与 iv，连续存放于一块 48 字节缓冲区
pub struct KeyIv(Zeroizing<[u8; KEY_IV_LEN]>);

impl KeyIv {
    pub fn key(&self) -> &[u8] {
        &self.0[..KEY_SIZE]
    }

    pub fn iv(&self) -> &[u8] {
        &self.0[KEY_SIZE..]
    }
}

impl fmt::Debug for KeyIv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyIv(..)")
    }
}

/// 根据口令和 salt 派生 key / iv
///
/// #### 参数
/// - `passphrase`：口令原始字节
/// - `salt`：8 字节 salt
/// - `digest`：摘要算法（旧格式为 MD5）
/// - `rounds`：每段摘要的迭代次数，旧格式为 1
///
/// #### 错误
/// - `rounds` 为 0 时返回 SaltencError::KeyDerivation
pub fn derive_key_iv(
    passphrase: &[u8],
    salt: &Salt,
    digest: KdfDigest,
    rounds: u32,
) -> Result<KeyIv, SaltencError> {
    if rounds == 0 {
        return Err(SaltencError::KeyDerivation(
            "iteration count must be at least 1".into(),
        ));
    }

    // 分配即清零，任何返回路径上都会被 Zeroizing 擦除
    let mut material = Zeroizing::new([0u8; KEY_IV_LEN]);

    match digest {
        KdfDigest::Md5 => {
            bytes_to_key::<Md5>(passphrase, salt.as_bytes(), rounds, &mut material[..])
        }
        KdfDigest::Sha256 => {
            bytes_to_key::<Sha256>(passphrase, salt.as_bytes(), rounds, &mut material[..])
        }
    }

    log::debug!("derived key material with {digest}, {rounds} round(s)");

    Ok(KeyIv(material))
}

fn bytes_to_key<D: Digest>(passphrase: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
    let mut previous: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());
    let mut filled = 0;

    while filled < out.len() {
        let mut hasher = D::new();
        hasher.update(&previous[..]);
        hasher.update(passphrase);
        hasher.update(salt);
        let mut block = hasher.finalize();

        for _ in 1..rounds {
            block = D::digest(&block);
        }

        let take = block.len().min(out.len() - filled);
        out[filled..filled + take].copy_from_slice(&block[..take]);
        filled += take;

        previous = Zeroizing::new(block.to_vec());
        block.iter_mut().for_each(|b| *b = 0);
    }
}
