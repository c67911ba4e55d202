//! saltenc 命令行入口
//!
//! 用法：
//!   saltenc enc <infile> <outfile> [passphrase | -] [salt]
//!   saltenc dec <infile> <outfile> [passphrase | -] [salt]
//!
//! - 口令为 `-` 或省略（且未设置 SALTENC_PASSWORD）时交互式输入
//! - salt 必须恰好是 16 个十六进制字符；解密时给出 salt 表示输入不带 Header
//! - 所有实际逻辑都委托给库 crate

use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use zeroize::Zeroizing;

use saltenc::crypto::{OPENSSL_ROUNDS, derive_key_iv};
use saltenc::format::DEFAULT_CHUNK_SIZE;
use saltenc::passphrase::{PROMPT_SENTINEL, Passphrase, TerminalPrompt};
use saltenc::{KdfDigest, Options, Salt, SaltencError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Encrypt infile into an OpenSSL-compatible "Salted__" container
    #[value(alias = "encrypt")]
    Enc,
    /// Decrypt a "Salted__" container
    #[value(alias = "decrypt")]
    Dec,
}

#[derive(Debug, Parser)]
#[command(name = "saltenc")]
#[command(
    version,
    about = "Encrypt and decrypt files in the `openssl enc -aes-256-cbc` format."
)]
struct Cli {
    /// Operation mode
    #[arg(value_enum)]
    mode: Mode,

    /// Input file
    input: PathBuf,

    /// Output file (replaced only when the run succeeds)
    output: PathBuf,

    /// Passphrase, or `-` to read it without echo
    #[arg(env = "SALTENC_PASSWORD", hide_env_values = true)]
    passphrase: Option<String>,

    /// Salt as exactly 16 hex characters
    salt: Option<Salt>,

    /// Digest used by the key derivation (md5 or sha256)
    #[arg(long = "md", default_value_t = KdfDigest::Md5)]
    digest: KdfDigest,

    /// Read chunk size in bytes, a multiple of 16
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Print the salt, key and iv like `openssl enc -p`
    #[arg(short = 'p', long)]
    print_key: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<SaltencError>() {
            Some(inner) => eprintln!("Error [{}]: {e:#}", inner.category()),
            None => eprintln!("Error: {e:#}"),
        }
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = Options {
        salt: cli.salt,
        digest: cli.digest,
        chunk_size: cli.chunk_size,
    };
    options.validate()?;

    let passphrase = Passphrase::from_arg(
        cli.passphrase
            .unwrap_or_else(|| PROMPT_SENTINEL.to_string()),
    )
    .resolve(&mut TerminalPrompt)?;

    let report = match cli.mode {
        Mode::Enc => saltenc::encrypt(&cli.input, &cli.output, passphrase.as_bytes(), &options)
            .with_context(|| format!("could not encrypt {}", cli.input.display()))?,
        Mode::Dec => saltenc::decrypt(&cli.input, &cli.output, passphrase.as_bytes(), &options)
            .with_context(|| format!("could not decrypt {}", cli.input.display()))?,
    };

    if cli.print_key {
        let key_iv = derive_key_iv(
            passphrase.as_bytes(),
            &report.salt,
            options.digest,
            OPENSSL_ROUNDS,
        )?;
        println!("salt={}", report.salt);
        println!("key={}", Zeroizing::new(hex::encode_upper(key_iv.key())).as_str());
        println!("iv ={}", Zeroizing::new(hex::encode_upper(key_iv.iv())).as_str());
    }

    log::info!(
        "{:?}: {} -> {} ({} bytes in, {} bytes out)",
        cli.mode,
        cli.input.display(),
        cli.output.display(),
        report.stats.bytes_read,
        report.stats.bytes_written
    );

    Ok(())
}
