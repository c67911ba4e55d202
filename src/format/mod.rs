//! OpenSSL `enc` 容器格式：Header、PKCS#7 填充与分块流水线。

pub mod buffer;
pub mod header;
pub mod padding;
pub mod stream;

pub use header::{HEADER_SIZE, Header, MAGIC, read_header, write_header};
pub use stream::{DEFAULT_CHUNK_SIZE, StreamDecryptor, StreamEncryptor, StreamStats};
