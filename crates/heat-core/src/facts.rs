//! Host facts supplied by the caller
//!
//! Resolution never branches on these; they are carried for logging and
//! so the caller can decide whether it runs on a supported platform.

use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::Result;

/// Operating system family of the target host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Debian,
    RedHat,
    Other(String),
}

impl OsFamily {
    /// Derive the family from an `/etc/os-release` body.
    ///
    /// `ID_LIKE` is consulted before `ID` so derivatives such as Ubuntu or
    /// Rocky map onto their parent family.
    pub fn from_os_release(content: &str) -> Self {
        let mut id = None;
        let mut id_like = None;

        for line in content.lines() {
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                match key.trim() {
                    "ID" => id = Some(value.to_string()),
                    "ID_LIKE" => id_like = Some(value.to_string()),
                    _ => {}
                }
            }
        }

        let candidates = id_like
            .iter()
            .flat_map(|like| like.split_whitespace())
            .chain(id.as_deref());

        for candidate in candidates {
            match candidate.to_ascii_lowercase().as_str() {
                "debian" | "ubuntu" => return OsFamily::Debian,
                "rhel" | "fedora" | "centos" | "rocky" | "almalinux" => return OsFamily::RedHat,
                _ => {}
            }
        }

        OsFamily::Other(id.unwrap_or_else(|| "unknown".to_string()))
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, OsFamily::Other(_))
    }
}

impl FromStr for OsFamily {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "debian" => OsFamily::Debian,
            "redhat" => OsFamily::RedHat,
            _ => OsFamily::Other(s.to_string()),
        })
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Debian => f.write_str("Debian"),
            OsFamily::RedHat => f.write_str("RedHat"),
            OsFamily::Other(name) => f.write_str(name),
        }
    }
}

/// Facts about the host a resolution is made for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facts {
    pub os_family: OsFamily,
}

impl Facts {
    pub fn new(os_family: OsFamily) -> Self {
        Self { os_family }
    }

    /// Read facts from an os-release file, if one exists.
    pub fn from_os_release_file(path: &Path) -> Result<Self> {
        let family = match heat_fs::io::read_text_if_exists(path)? {
            Some(content) => OsFamily::from_os_release(&content),
            None => OsFamily::Other("unknown".to_string()),
        };
        Ok(Self::new(family))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fact_values_case_insensitively() {
        assert_eq!("Debian".parse::<OsFamily>().unwrap(), OsFamily::Debian);
        assert_eq!("redhat".parse::<OsFamily>().unwrap(), OsFamily::RedHat);
        assert_eq!(
            "Solaris".parse::<OsFamily>().unwrap(),
            OsFamily::Other("Solaris".to_string())
        );
    }

    #[test]
    fn os_release_prefers_id_like() {
        let ubuntu = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\n";
        assert_eq!(OsFamily::from_os_release(ubuntu), OsFamily::Debian);

        let rocky = "ID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n";
        assert_eq!(OsFamily::from_os_release(rocky), OsFamily::RedHat);
    }

    #[test]
    fn os_release_unknown_distribution() {
        let family = OsFamily::from_os_release("ID=alpine\n");
        assert_eq!(family, OsFamily::Other("alpine".to_string()));
        assert!(!family.is_supported());
    }

    #[test]
    fn missing_os_release_is_unknown() {
        let temp = tempfile::TempDir::new().unwrap();
        let facts = Facts::from_os_release_file(&temp.path().join("os-release")).unwrap();
        assert_eq!(facts.os_family, OsFamily::Other("unknown".to_string()));
    }
}
