mod encrypt;
mod decrypt;

pub mod algorithm;
pub mod config;
pub mod crypto;
pub mod error;
pub mod format;
pub mod fs;
pub mod passphrase;

pub use algorithm::KdfDigest;
pub use config::Options;
pub use crypto::Salt;
pub use decrypt::decrypt_stream;
pub use encrypt::encrypt_stream;
pub use error::SaltencError;
pub use format::StreamStats;

use std::path::Path;

/// 一次加解密运行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// 本次使用的 salt
    pub salt: Salt,
    pub stats: StreamStats,
}

pub fn encrypt(
    input: &Path,
    output: &Path,
    passphrase: &[u8],
    options: &Options,
) -> Result<RunReport, SaltencError> {
    encrypt::encrypt_file(input, output, passphrase, options)
}

pub fn decrypt(
    input: &Path,
    output: &Path,
    passphrase: &[u8],
    options: &Options,
) -> Result<RunReport, SaltencError> {
    decrypt::decrypt_file(input, output, passphrase, options)
}
