//! File helpers behind the `encrypt` and `decrypt` subcommands.
//!
//! Output is always written to a temporary file next to its destination
//! and renamed into place once the codec finished, so a failed run never
//! leaves a partial file behind. The input's permission bits are carried
//! over to the output in both directions.

use std::env;
use std::fs::{self, File, Permissions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chunkseal_core::{CodecConfig, Decryptor, Encryptor, TelemetrySnapshot};
use tempfile::NamedTempFile;
use tracing::debug;

/// Extension appended to encrypted files when no output is given.
pub const ENCRYPTED_EXT: &str = "aes";

/// A decrypted file and the name stored inside the container.
#[derive(Debug)]
pub struct DecryptedFile {
    pub path: PathBuf,
    pub stored_name: String,
    pub telemetry: TelemetrySnapshot,
}

/// Expand a leading `~` to the home directory and make the path absolute.
pub fn expand_path(p: &Path) -> Result<PathBuf> {
    let expanded = match p.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .context("cannot resolve home directory")?
            .join(rest),
        Err(_) => p.to_path_buf(),
    };
    absolute(&expanded)
}

/// `IN` -> `IN.aes`
pub fn default_encrypted_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(ENCRYPTED_EXT);
    PathBuf::from(name)
}

/// Encrypt `input` into `output`, storing the input's file name as extra
/// metadata.
pub fn encrypt_file(
    input: &Path,
    output: &Path,
    secret_key: &str,
    config: &CodecConfig,
    force: bool,
) -> Result<TelemetrySnapshot> {
    let input = absolute(input)?;
    let output = absolute(output)?;
    if input == output {
        bail!("input and output are the same file: {}", input.display());
    }
    refuse_existing(&output, force)?;

    let encryptor = Encryptor::new(secret_key, *config)?;
    let source = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
    let perms = source.metadata()?.permissions();
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut temp = temp_in(&parent_dir(&output))?;
    let snapshot = {
        let mut reader = BufReader::new(source);
        let mut writer = BufWriter::new(temp.as_file_mut());
        encryptor
            .encrypt(&mut reader, &mut writer, Some(name.as_bytes()))
            .with_context(|| format!("encrypting {}", input.display()))?
    };

    persist(temp, &output, perms, force)?;
    Ok(snapshot)
}

/// Decrypt `input`. Without `output` the plaintext is restored under the
/// file name stored in the container, in the input's directory.
pub fn decrypt_file(
    input: &Path,
    output: Option<&Path>,
    secret_key: &str,
    config: &CodecConfig,
    force: bool,
) -> Result<DecryptedFile> {
    let input = absolute(input)?;
    let output = output.map(absolute).transpose()?;
    if let Some(out) = &output {
        refuse_existing(out, force)?;
    }

    let decryptor = Decryptor::new(secret_key, *config)?;
    let source = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
    let perms = source.metadata()?.permissions();

    let dir = match &output {
        Some(out) => parent_dir(out),
        None => parent_dir(&input),
    };
    let mut temp = temp_in(&dir)?;
    let outcome = {
        let mut reader = BufReader::new(source);
        let mut writer = BufWriter::new(temp.as_file_mut());
        decryptor
            .decrypt(&mut reader, &mut writer)
            .with_context(|| format!("decrypting {}", input.display()))?
    };

    let stored_name = String::from_utf8_lossy(&outcome.extra).into_owned();
    let dest = match output {
        Some(out) => out,
        None => dir.join(plain_file_name(&stored_name)?),
    };
    if dest == input {
        bail!("refusing to replace the encrypted input: {}", input.display());
    }
    refuse_existing(&dest, force)?;

    persist(temp, &dest, perms, force)?;
    Ok(DecryptedFile {
        path: dest,
        stored_name,
        telemetry: outcome.telemetry,
    })
}

fn absolute(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    Ok(env::current_dir()?.join(p))
}

fn parent_dir(p: &Path) -> PathBuf {
    p.parent()
        .filter(|d| !d.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn refuse_existing(p: &Path, force: bool) -> Result<()> {
    if !force && p.exists() {
        bail!("output file exists (use -f to overwrite): {}", p.display());
    }
    Ok(())
}

/// The stored name must be a bare file name; anything with a directory
/// part could write outside the target directory.
fn plain_file_name(name: &str) -> Result<&Path> {
    let p = Path::new(name);
    match p.file_name() {
        Some(f) if f == p.as_os_str() => Ok(p),
        _ => bail!("stored file name is not usable, pass -o: {name:?}"),
    }
}

fn temp_in(dir: &Path) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".chunkseal-")
        .tempfile_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))
}

fn persist(temp: NamedTempFile, dest: &Path, perms: Permissions, force: bool) -> Result<()> {
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), perms)?;
    debug!(from = %temp.path().display(), to = %dest.display(), "renaming output");

    let res = if force {
        temp.persist(dest)
    } else {
        temp.persist_noclobber(dest)
    };
    res.with_context(|| format!("writing {}", dest.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkseal_core::StreamError;

    const KEY: &str = "file test key";

    fn cfg() -> CodecConfig {
        CodecConfig::default().with_max_chunk_size(4_096)
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn encrypt_then_restore_under_stored_name() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let plain = src_dir.path().join("notes.txt");
        fs::write(&plain, sample(20_000)).unwrap();

        let sealed = out_dir.path().join("sealed.aes");
        let snap = encrypt_file(&plain, &sealed, KEY, &cfg(), false).unwrap();
        assert_eq!(snap.bytes_plaintext, 20_000);
        assert_eq!(snap.bytes_extra, "notes.txt".len() as u64);

        let restored = decrypt_file(&sealed, None, KEY, &cfg(), false).unwrap();
        assert_eq!(restored.stored_name, "notes.txt");
        assert_eq!(restored.path, out_dir.path().join("notes.txt"));
        assert_eq!(fs::read(&restored.path).unwrap(), sample(20_000));
    }

    #[test]
    fn decrypt_to_explicit_output() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("a.bin");
        fs::write(&plain, b"explicit").unwrap();
        let sealed = default_encrypted_path(&plain);
        encrypt_file(&plain, &sealed, KEY, &cfg(), false).unwrap();

        let target = dir.path().join("b.bin");
        let out = decrypt_file(&sealed, Some(&target), KEY, &cfg(), false).unwrap();
        assert_eq!(out.path, target);
        assert_eq!(out.stored_name, "a.bin");
        assert_eq!(fs::read(target).unwrap(), b"explicit");
    }

    #[test]
    fn default_output_appends_extension() {
        assert_eq!(
            default_encrypted_path(Path::new("/tmp/report.pdf")),
            PathBuf::from("/tmp/report.pdf.aes")
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("in.txt");
        let sealed = dir.path().join("in.txt.aes");
        fs::write(&plain, b"data").unwrap();
        fs::write(&sealed, b"already here").unwrap();

        let err = encrypt_file(&plain, &sealed, KEY, &cfg(), false).unwrap_err();
        assert!(err.to_string().contains("exists"), "{err}");
        assert_eq!(fs::read(&sealed).unwrap(), b"already here");

        encrypt_file(&plain, &sealed, KEY, &cfg(), true).unwrap();
        let out = decrypt_file(&sealed, Some(&dir.path().join("copy.txt")), KEY, &cfg(), false).unwrap();
        assert_eq!(fs::read(out.path).unwrap(), b"data");
    }

    #[test]
    fn restore_refuses_existing_file_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("keep.txt");
        fs::write(&plain, b"original").unwrap();
        let sealed = dir.path().join("keep.txt.aes");
        encrypt_file(&plain, &sealed, KEY, &cfg(), false).unwrap();

        assert!(decrypt_file(&sealed, None, KEY, &cfg(), false).is_err());
        assert_eq!(fs::read(&plain).unwrap(), b"original");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".chunkseal-"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files left behind");
    }

    #[test]
    fn wrong_key_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("secret.txt");
        fs::write(&plain, sample(10_000)).unwrap();
        let sealed = dir.path().join("secret.aes");
        encrypt_file(&plain, &sealed, KEY, &cfg(), false).unwrap();

        let target = dir.path().join("out.txt");
        let err = decrypt_file(&sealed, Some(&target), "other key", &cfg(), false).unwrap_err();
        let stream_err = err.downcast_ref::<StreamError>().expect("codec error");
        assert!(stream_err.is_authentication_failure());
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn truncated_container_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("big.bin");
        fs::write(&plain, sample(50_000)).unwrap();
        let sealed = dir.path().join("big.aes");
        encrypt_file(&plain, &sealed, KEY, &cfg(), false).unwrap();

        let bytes = fs::read(&sealed).unwrap();
        fs::write(&sealed, &bytes[..bytes.len() / 2]).unwrap();

        let target = dir.path().join("big.out");
        assert!(decrypt_file(&sealed, Some(&target), KEY, &cfg(), false).is_err());
        assert!(!target.exists());
    }

    #[test]
    fn stored_name_must_be_plain() {
        assert!(plain_file_name("report.txt").is_ok());
        assert!(plain_file_name("../escape").is_err());
        assert!(plain_file_name("a/b").is_err());
        assert!(plain_file_name("..").is_err());
        assert!(plain_file_name("").is_err());
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else { return };
        assert_eq!(expand_path(Path::new("~/x/y.txt")).unwrap(), home.join("x/y.txt"));
        assert!(expand_path(Path::new("rel.txt")).unwrap().is_absolute());
        assert_eq!(
            expand_path(Path::new("/abs/path")).unwrap(),
            PathBuf::from("/abs/path")
        );
    }

    #[cfg(unix)]
    #[test]
    fn permission_bits_are_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("script.sh");
        fs::write(&plain, b"#!/bin/sh\necho hi\n").unwrap();
        fs::set_permissions(&plain, Permissions::from_mode(0o640)).unwrap();

        let sealed = dir.path().join("script.sh.aes");
        encrypt_file(&plain, &sealed, KEY, &cfg(), false).unwrap();
        let mode = fs::metadata(&sealed).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);

        let target = dir.path().join("restored.sh");
        decrypt_file(&sealed, Some(&target), KEY, &cfg(), false).unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
