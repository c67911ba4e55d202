//! saltenc 解密流程实现
//!
//! 本模块负责将 "Salted__" 容器解密还原为原始数据。
//!
//! 解密流程（严格顺序）：
//! 1. 未显式给出 salt 时，读取并校验 Header，取出 salt
//! 2. 使用 KDF 从口令 + salt 派生 key / iv
//! 3. 初始化 StreamDecryptor
//! 4. 流式解密剩余数据
//!
//! 注意：
//! - 显式给出 salt 时，输入被视为不带 Header，不会读取前 16 字节
//! - 末块去填充失败即报错（密码错误或数据损坏）

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::RunReport;
use crate::algorithm::aes_256_cbc::Aes256CbcDec;
use crate::config::Options;
use crate::crypto::{OPENSSL_ROUNDS, derive_key_iv};
use crate::error::SaltencError;
use crate::format::{StreamDecryptor, read_header};
use crate::fs::atomic::write_atomic;

/// 解密任意输入流到输出流
pub fn decrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    passphrase: &[u8],
    options: &Options,
) -> Result<RunReport, SaltencError> {
    options.validate()?;

    // ---------- 获取 salt ----------
    let salt = match options.salt {
        Some(salt) => {
            log::debug!("decrypting with caller-supplied salt, header not read");
            salt
        }
        None => read_header(&mut reader)?,
    };

    // ---------- KDF 派生 key / iv ----------
    let key_iv = derive_key_iv(passphrase, &salt, options.digest, OPENSSL_ROUNDS)?;
    let cipher = Aes256CbcDec::new(key_iv.key(), key_iv.iv())?;
    drop(key_iv);

    // ---------- Stream 解密 ----------
    let stats = StreamDecryptor::new(cipher, options.chunk_size)?.decrypt(reader, &mut writer)?;

    writer.flush()?;

    Ok(RunReport { salt, stats })
}

/// 使用口令解密文件
pub fn decrypt_file(
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
        let report = decrypt_stream(reader, &mut writer, passphrase, options)?;
        writer.flush()?;
        Ok(report)
    })
}
