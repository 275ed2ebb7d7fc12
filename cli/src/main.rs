//! chunkseal - streaming authenticated file encryption.
//!
//! The secret key is read from the `CHUNKSEAL_KEY` environment variable
//! only. Keys given as arguments would show up in process listings and
//! shell history.

mod files;

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use chunkseal_core::{constants::DEFAULT_CHUNK_SIZE, CodecConfig, TelemetrySnapshot};
use tracing::info;
use zeroize::Zeroizing;

use crate::files::{decrypt_file, default_encrypted_path, encrypt_file, expand_path};

const KEY_ENV: &str = "CHUNKSEAL_KEY";

#[derive(Parser)]
#[command(name = "chunkseal")]
#[command(about = "Encrypt and decrypt files as authenticated chunk streams")]
#[command(after_help = "The secret key is taken from the CHUNKSEAL_KEY environment variable.")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file. The output defaults to IN.aes.
    Encrypt(CommonArgs),

    /// Decrypt a file. Without -o the original file name is restored next
    /// to the input.
    Decrypt(CommonArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Input file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite an existing output file.
    #[arg(short, long)]
    force: bool,

    /// Plaintext bytes per chunk; when decrypting, the largest chunk accepted.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Print stream telemetry as JSON on stdout.
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let key = secret_key()?;

    match cli.command {
        Commands::Encrypt(args) => cmd_encrypt(&args, &key),
        Commands::Decrypt(args) => cmd_decrypt(&args, &key),
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn secret_key() -> Result<Zeroizing<String>> {
    let key = Zeroizing::new(
        env::var(KEY_ENV).with_context(|| format!("missing secret key: set {KEY_ENV}"))?,
    );
    if key.is_empty() {
        bail!("missing secret key: {KEY_ENV} is empty");
    }
    Ok(key)
}

fn config(args: &CommonArgs) -> Result<CodecConfig> {
    let cfg = CodecConfig::default().with_max_chunk_size(args.chunk_size);
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_encrypt(args: &CommonArgs, key: &str) -> Result<()> {
    let input = expand_path(&args.input)?;
    let output = match &args.output {
        Some(p) => expand_path(p)?,
        None => default_encrypted_path(&input),
    };
    if !input.is_file() {
        bail!("input file does not exist: {}", input.display());
    }

    let snapshot = encrypt_file(&input, &output, key, &config(args)?, args.force)?;
    info!(input = %input.display(), output = %output.display(), "encrypted");

    if args.stats {
        print_stats(&snapshot)?;
    }
    Ok(())
}

fn cmd_decrypt(args: &CommonArgs, key: &str) -> Result<()> {
    let input = expand_path(&args.input)?;
    let output = args.output.as_deref().map(expand_path).transpose()?;
    if !input.is_file() {
        bail!("input file does not exist: {}", input.display());
    }

    let restored = decrypt_file(&input, output.as_deref(), key, &config(args)?, args.force)?;
    info!(
        input = %input.display(),
        output = %restored.path.display(),
        stored_name = %restored.stored_name,
        "decrypted"
    );

    if args.stats {
        print_stats(&restored.telemetry)?;
    }
    Ok(())
}

fn print_stats(snapshot: &TelemetrySnapshot) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}
