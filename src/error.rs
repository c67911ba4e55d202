use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaltencError {
    #[error("invalid container header: {0}")]
    Format(String),

    #[error("invalid padding: {0}")]
    Padding(&'static str),

    #[error("bad decrypt: wrong passphrase or corrupted data")]
    Decryption,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("cipher error: {0}")]
    Cipher(String),

    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("bad salt: {0}")]
    Salt(String),

    #[error("not enough random data")]
    Random,

    #[error("could not read passphrase: {0}")]
    Passphrase(String),
}

impl SaltencError {
    /// 简短且稳定的错误类别，CLI 用于区分“读写失败”与“密码错误/文件损坏”
    pub fn category(&self) -> &'static str {
        match self {
            Self::Format(_) => "format",
            Self::Padding(_) => "padding",
            Self::Decryption => "decryption",
            Self::KeyDerivation(_) => "key-derivation",
            Self::Cipher(_) => "cipher",
            Self::Stream(_) => "stream",
            Self::Salt(_) => "salt",
            Self::Random => "random",
            Self::Passphrase(_) => "passphrase",
        }
    }
}
