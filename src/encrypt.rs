//! saltenc 加密流程实现
//!
//! 本模块负责将明文加密为 OpenSSL `enc` 兼容的 "Salted__" 容器。
//!
//! 加密流程（严格顺序）：
//! 1. 获取 salt（显式给出或随机生成）
//! 2. 使用 KDF 从口令 + salt 派生 key / iv
//! 3. 写入 Header
//! 4. 使用 StreamEncryptor 对内容进行流式加密
//!
//! 注意：
//! - 显式给出 salt 时仍然写入 Header，与旧工具行为一致
//! - 不做 UI / 口令输入

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::RunReport;
use crate::algorithm::aes_256_cbc::Aes256CbcEnc;
use crate::config::Options;
use crate::crypto::{OPENSSL_ROUNDS, Salt, derive_key_iv};
use crate::error::SaltencError;
use crate::format::{Header, StreamEncryptor};
use crate::fs::atomic::write_atomic;

/// 加密任意输入流到输出流
pub fn encrypt_stream<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    passphrase: &[u8],
    options: &Options,
) -> Result<RunReport, SaltencError> {
    options.validate()?;

    // ---------- 获取 salt ----------
    let salt = match options.salt {
        Some(salt) => salt,
        None => Salt::generate()?,
    };
    log::debug!(
        "encrypting with {} salt",
        if options.salt.is_some() { "caller-supplied" } else { "random" }
    );

    // ---------- KDF 派生 key / iv ----------
    let key_iv = derive_key_iv(passphrase, &salt, options.digest, OPENSSL_ROUNDS)?;
    let cipher = Aes256CbcEnc::new(key_iv.key(), key_iv.iv())?;
    drop(key_iv);

    // ---------- 写入 Header ----------
    Header::new(salt).write(&mut writer)?;

    // ---------- Stream 加密 ----------
    let stats = StreamEncryptor::new(cipher, options.chunk_size)?.encrypt(reader, &mut writer)?;

    writer.flush()?;

    Ok(RunReport { salt, stats })
}

/// 使用口令加密文件
///
/// 输出先写入临时文件，成功后才替换目标文件；失败时不会留下残缺输出。
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase: &[u8],
    options: &Options,
) -> Result<RunReport, SaltencError> {
    // ---------- 打开输入文件 ----------
    let input = File::open(input_path)?;
    let reader = BufReader::new(input);

    write_atomic(output_path, |file| {
        let mut writer = BufWriter::new(file);
        let report = encrypt_stream(reader, &mut writer, passphrase, options)?;
        // 确保所有数据落盘
        writer.flush()?;
        Ok(report)
    })
}
