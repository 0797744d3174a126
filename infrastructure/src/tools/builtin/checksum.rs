use std::fs::File;
use std::io;
use std::path::Path;

use modbuild_domain::ToolOutput;
use sha2::{Digest, Sha256, Sha512};

/// Exit code when the computed digest differs from the expected one
pub const CHECKSUM_MISMATCH_CODE: i32 = 2;

const USAGE: &str = "Usage: checksum FILE [ALGORITHM [EXPECTED]]\n";

fn digest<D: Digest + io::Write>(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = D::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

fn compute(path: &Path, algorithm: &str) -> Result<io::Result<String>, String> {
    match algorithm.to_ascii_uppercase().replace('-', "").as_str() {
        "SHA256" => Ok(digest::<Sha256>(path)),
        "SHA512" => Ok(digest::<Sha512>(path)),
        _ => Err(format!("Unsupported algorithm: {algorithm}\n")),
    }
}

/// Print the digest of a file, or verify it against an expected value
pub fn checksum(arguments: &[String]) -> ToolOutput {
    let (file, algorithm, expected) = match arguments {
        [file] => (file, "SHA-256", None),
        [file, algorithm] => (file, algorithm.as_str(), None),
        [file, algorithm, expected] => (file, algorithm.as_str(), Some(expected)),
        _ => return ToolOutput::failure(1, USAGE),
    };

    let computed = match compute(Path::new(file), algorithm) {
        Ok(Ok(computed)) => computed,
        Ok(Err(e)) => return ToolOutput::failure(1, format!("Cannot read {file}: {e}\n")),
        Err(message) => return ToolOutput::failure(1, message),
    };

    match expected {
        Some(expected) if !expected.eq_ignore_ascii_case(&computed) => ToolOutput::failure(
            CHECKSUM_MISMATCH_CODE,
            format!("Checksum mismatch for {file}: expected {expected}, computed {computed}\n"),
        ),
        _ => ToolOutput::success(format!("{computed}  {file}\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn fixture() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, "abc").unwrap();
        let path = path.display().to_string();
        (dir, path)
    }

    #[test]
    fn test_default_algorithm_is_sha256() {
        let (_dir, path) = fixture();
        let output = checksum(&[path.clone()]);
        assert_eq!(output.code, 0);
        assert_eq!(output.out, format!("{ABC_SHA256}  {path}\n"));
    }

    #[test]
    fn test_expected_value_matches_case_insensitively() {
        let (_dir, path) = fixture();
        let output = checksum(&[path, "sha256".to_string(), ABC_SHA256.to_uppercase()]);
        assert_eq!(output.code, 0);
    }

    #[test]
    fn test_mismatch_exits_two() {
        let (_dir, path) = fixture();
        let output = checksum(&[path, "SHA-256".to_string(), "00".to_string()]);
        assert_eq!(output.code, CHECKSUM_MISMATCH_CODE);
        assert!(output.err.contains("mismatch"));
    }

    #[test]
    fn test_sha512_and_unknown_algorithm() {
        let (_dir, path) = fixture();
        let output = checksum(&[path.clone(), "SHA-512".to_string()]);
        assert_eq!(output.code, 0);
        assert!(output.out.starts_with("ddaf35a193617aba"));

        let output = checksum(&[path, "MD5".to_string()]);
        assert_eq!(output.code, 1);
        assert!(output.err.contains("Unsupported"));
    }

    #[test]
    fn test_missing_file_and_usage() {
        assert_eq!(checksum(&["/nonexistent/file".to_string()]).code, 1);
        assert_eq!(checksum(&[]).code, 1);
    }
}
