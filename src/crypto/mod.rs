//! 口令相关的密码学原语：salt 与密钥派生。

pub mod kdf;
pub mod salt;

pub use kdf::{KeyIv, OPENSSL_ROUNDS, derive_key_iv};
pub use salt::{SALT_SIZE, Salt};
