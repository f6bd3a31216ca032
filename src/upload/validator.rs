use crate::error::{ValidationError, MAX_UPLOAD_BYTES};
use crate::upload::types::CandidateFile;

/// Checks a picked file against the service's acceptance rules.
///
/// Accepted files are handed back untouched.
pub fn validate(file: CandidateFile) -> Result<CandidateFile, ValidationError> {
    if !file.name.to_lowercase().ends_with(".zip") {
        return Err(ValidationError::BadExtension);
    }

    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size: file.size });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, size: u64) -> CandidateFile {
        CandidateFile::new(format!("/tmp/{}", name), name, size)
    }

    #[test]
    fn test_accepts_zip_any_case() {
        assert!(validate(candidate("study.zip", 10)).is_ok());
        assert!(validate(candidate("STUDY.ZIP", 10)).is_ok());
        assert!(validate(candidate("series.Zip", 0)).is_ok());
    }

    #[test]
    fn test_rejects_other_extensions() {
        for name in ["study.tar.gz", "study.zip.txt", "zip", "study", "dicom.dcm"] {
            assert_eq!(
                validate(candidate(name, 10)),
                Err(ValidationError::BadExtension),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_size_boundary() {
        let exact = candidate("big.zip", 1 << 30);
        assert_eq!(validate(exact.clone()), Ok(exact));

        assert_eq!(
            validate(candidate("big.zip", (1 << 30) + 1)),
            Err(ValidationError::TooLarge {
                size: (1 << 30) + 1
            })
        );
    }

    #[test]
    fn test_extension_checked_before_size() {
        let err = validate(candidate("huge.iso", u64::MAX)).unwrap_err();
        assert_eq!(err.reason(), "bad_extension");
    }
}
