use chrono::{DateTime, FixedOffset};
use home::home_dir;
use log::info;
use std::{
    fs,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::{
    aws::SessionCredentials,
    ini::{parse, write_document, Document},
    Error, Result,
};

pub const ACCESS_KEY_ID: &str = "aws_access_key_id";
pub const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
pub const SESSION_TOKEN: &str = "aws_session_token";
pub const EXPIRATION: &str = "expiration";

/// `~/.aws/credentials`
pub fn default_path() -> Result<PathBuf> {
    home_dir()
        .map(|home| home.join(Path::new(".aws/credentials")))
        .ok_or(Error::Home)
}

/// A credentials file loaded into memory, written back with [`CredentialsFile::save`].
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
    document: Document,
}

impl CredentialsFile {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        info!("Parsing credentials file {}", path.display());

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingFile { path })
            }
            Err(source) => return Err(Error::Io { path, source }),
        };
        let document = parse(&text).map_err(|source| Error::Format {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Writes `creds` into `section`, creating it if needed.
    pub fn apply(&mut self, section: &str, creds: &SessionCredentials) {
        let doc = &mut self.document;
        doc.set_value(section, ACCESS_KEY_ID, creds.access_key_id.as_str());
        doc.set_value(section, SECRET_ACCESS_KEY, creds.secret_access_key.as_str());
        doc.set_value(section, SESSION_TOKEN, creds.session_token.as_str());
        doc.set_value(section, EXPIRATION, creds.expiration.to_rfc3339());
    }

    /// Expiration recorded by a previous [`CredentialsFile::apply`], if any.
    pub fn session_expiry(&self, section: &str) -> Result<Option<DateTime<FixedOffset>>> {
        self.document
            .get(section, EXPIRATION)
            .map(|value| {
                DateTime::parse_from_rfc3339(value).map_err(|source| Error::Expiry {
                    section: section.to_string(),
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Replaces the file on disk through a temporary file in the same directory.
    ///
    /// A symlinked path is resolved first, so the link stays and its target is updated.
    pub fn save(&self) -> Result<()> {
        let io_err = |source: io::Error| Error::Io {
            path: self.path.clone(),
            source,
        };
        let target = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut outfile = NamedTempFile::new_in(dir).map_err(io_err)?;
        write_document(&self.document, BufWriter::new(&mut outfile)).map_err(io_err)?;
        outfile.as_file().sync_all().map_err(io_err)?;
        if let Ok(meta) = fs::metadata(&target) {
            fs::set_permissions(outfile.path(), meta.permissions()).map_err(io_err)?;
        }
        outfile.persist(&target).map_err(|err| io_err(err.error))?;

        info!("Saved credentials file {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::fs::read_to_string;

    const FIXTURE: &str = include_str!("../fixtures/credentials.ini");

    fn session() -> SessionCredentials {
        SessionCredentials {
            access_key_id: "ASIANEW".to_string(),
            secret_access_key: "secret/new".to_string(),
            session_token: "token==".to_string(),
            expiration: Local.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    fn fixture_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, FIXTURE).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_path() {
        if let Ok(path) = default_path() {
            assert!(path.ends_with(".aws/credentials"));
        }
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CredentialsFile::load(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::MissingFile { .. }));
    }

    #[test]
    fn load_reports_line_of_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, "[default]\naws_access_key_id\n").unwrap();

        match CredentialsFile::load(&path).unwrap_err() {
            Error::Format { source, .. } => assert_eq!(source.line, 2),
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn save_without_changes_round_trips_fixture() {
        let (_dir, path) = fixture_file();
        CredentialsFile::load(&path).unwrap().save().unwrap();
        assert_eq!(read_to_string(&path).unwrap(), FIXTURE);
    }

    #[test]
    fn apply_overwrites_existing_section_in_place() {
        let (_dir, path) = fixture_file();
        let mut file = CredentialsFile::load(&path).unwrap();
        file.apply("mfa", &session());
        file.save().unwrap();

        let doc = parse(&read_to_string(&path).unwrap()).unwrap();
        let names: Vec<_> = doc.sections().map(|(name, _)| name).collect();
        assert_eq!(names, ["default", "mfa", "work"]);
        assert_eq!(doc.get("mfa", ACCESS_KEY_ID), Some("ASIANEW"));
        assert_eq!(doc.get("mfa", SECRET_ACCESS_KEY), Some("secret/new"));
        assert_eq!(doc.get("mfa", SESSION_TOKEN), Some("token=="));
        assert_eq!(doc.section("default"), file.document().section("default"));
        assert_eq!(doc.section("work"), parse(FIXTURE).unwrap().section("work"));
    }

    #[test]
    fn apply_creates_section_and_expiry_reads_back() {
        let (_dir, path) = fixture_file();
        let mut file = CredentialsFile::load(&path).unwrap();
        assert_eq!(file.session_expiry("fresh").unwrap(), None);

        file.apply("fresh", &session());
        file.save().unwrap();

        let file = CredentialsFile::load(&path).unwrap();
        let keys: Vec<_> = file.document().section("fresh").unwrap().keys().collect();
        assert_eq!(keys, [ACCESS_KEY_ID, SECRET_ACCESS_KEY, SESSION_TOKEN, EXPIRATION]);
        assert_eq!(file.session_expiry("fresh").unwrap(), Some(session().expiration.into()));
        assert!(read_to_string(&path).unwrap().starts_with(FIXTURE));
    }

    #[test]
    fn bad_expiry_is_reported() {
        let mut file = CredentialsFile {
            path: PathBuf::from("credentials"),
            document: Document::new(),
        };
        file.document_mut().set_value("mfa", EXPIRATION, "soon");
        assert!(matches!(
            file.session_expiry("mfa"),
            Err(Error::Expiry { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = fixture_file();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        CredentialsFile::load(&path).unwrap().save().unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn save_through_symlink_updates_target() {
        let (dir, real) = fixture_file();
        let link = dir.path().join("linked");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut file = CredentialsFile::load(&link).unwrap();
        file.apply("mfa", &session());
        file.save().unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let doc = parse(&read_to_string(&real).unwrap()).unwrap();
        assert_eq!(doc.get("mfa", ACCESS_KEY_ID), Some("ASIANEW"));
    }
}
