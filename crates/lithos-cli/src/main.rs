use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lithos_crypto::hash::{GimliHash, HASH_DEFAULT_LEN};

/// Print Gimli sponge digests of files or standard input.
///
/// Output format: 64 lowercase hex digits, two spaces, then the file name
/// (`-` for standard input).
#[derive(Parser)]
#[command(name = "lithos-hash")]
#[command(about = "Print Gimli sponge digests of files or standard input")]
#[command(version)]
struct Cli {
    /// Files to hash; standard input when none are given.
    files: Vec<PathBuf>,
}

fn hash_reader(mut reader: impl Read) -> io::Result<String> {
    let mut state = GimliHash::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        state.update(&buf[..n]);
    }
    let mut digest = [0u8; HASH_DEFAULT_LEN];
    state.finalize(&mut digest);
    Ok(hex::encode(digest))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.files.is_empty() {
        match hash_reader(io::stdin().lock()) {
            Ok(digest) => println!("{digest}  -"),
            Err(err) => {
                eprintln!("read: {err}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    for path in &cli.files {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(err) => {
                eprintln!("open: {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        };
        log::debug!("hashing {}", path.display());
        match hash_reader(file) {
            Ok(digest) => println!("{digest}  {}", path.display()),
            Err(err) => {
                eprintln!("read: {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
