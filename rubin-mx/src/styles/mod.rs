//! Style profile store
//!
//! Built-in profiles are compiled into the binary. User profiles live as
//! `<name>.json` files in a user directory (normally `<root>/styles`) and
//! take precedence over a built-in of the same name.

use rubin_common::{Error, Result, StyleProfile};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Built-in profiles as (name, JSON)
const BUILTIN_STYLES: &[(&str, &str)] = &[
    ("ambient", include_str!("../../styles/ambient.json")),
    ("downtempo", include_str!("../../styles/downtempo.json")),
    ("drum-and-bass", include_str!("../../styles/drum-and-bass.json")),
    ("edm", include_str!("../../styles/edm.json")),
    ("folk", include_str!("../../styles/folk.json")),
    ("hip-hop", include_str!("../../styles/hip-hop.json")),
    ("house", include_str!("../../styles/house.json")),
    ("industrial", include_str!("../../styles/industrial.json")),
    ("jazz", include_str!("../../styles/jazz.json")),
    ("lo-fi", include_str!("../../styles/lo-fi.json")),
    ("orchestral", include_str!("../../styles/orchestral.json")),
    ("rnb", include_str!("../../styles/rnb.json")),
    ("rock", include_str!("../../styles/rock.json")),
    ("synthpop", include_str!("../../styles/synthpop.json")),
    ("techno", include_str!("../../styles/techno.json")),
    ("vaporwave", include_str!("../../styles/vaporwave.json")),
];

/// Names of all built-in profiles, sorted
pub fn builtin_names() -> Vec<&'static str> {
    BUILTIN_STYLES.iter().map(|(name, _)| *name).collect()
}

/// Reject names that could escape the user directory
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("style name must not be empty".to_string()));
    }
    if name.starts_with('.') || name.contains(['/', '\\']) || name.contains('\0') {
        return Err(Error::InvalidInput(format!("invalid style name: {:?}", name)));
    }
    Ok(())
}

fn parse_profile(json: &str, source: &str) -> Result<StyleProfile> {
    let profile: StyleProfile = serde_json::from_str(json)?;
    let unknown = profile.unknown_bands();
    if !unknown.is_empty() {
        warn!(
            style = %profile.name,
            source,
            bands = ?unknown,
            "Style profile names unknown bands; they will not be scored"
        );
    }
    Ok(profile)
}

#[derive(Debug, Clone)]
pub struct StyleStore {
    user_dir: PathBuf,
}

impl StyleStore {
    pub fn new(user_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_dir: user_dir.into(),
        }
    }

    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    fn user_path(&self, name: &str) -> PathBuf {
        self.user_dir.join(format!("{}.json", name))
    }

    /// Load a profile by name, user profiles first
    pub fn load(&self, name: &str) -> Result<StyleProfile> {
        validate_name(name)?;

        let path = self.user_path(name);
        match fs::read_to_string(&path) {
            Ok(json) => {
                debug!(style = name, path = %path.display(), "Loaded user style");
                return parse_profile(&json, "user");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        BUILTIN_STYLES
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, json)| parse_profile(json, "builtin"))
            .unwrap_or_else(|| Err(Error::NotFound(format!("style profile '{}'", name))))
    }

    /// Sorted, de-duplicated names of every available profile
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names: BTreeSet<String> = builtin_names().into_iter().map(String::from).collect();
        names.extend(self.user_style_names()?);
        Ok(names.into_iter().collect())
    }

    /// Names of the profiles stored in the user directory
    pub fn user_style_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.user_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn is_user_style(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.user_path(name).is_file()
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        BUILTIN_STYLES.iter().any(|(builtin, _)| *builtin == name)
    }

    /// Write `profile` to the user directory, replacing any previous version
    pub fn save_user(&self, profile: &StyleProfile) -> Result<PathBuf> {
        validate_name(&profile.name)?;
        fs::create_dir_all(&self.user_dir)?;

        let path = self.user_path(&profile.name);
        fs::write(&path, serde_json::to_string_pretty(profile)?)?;
        info!(style = %profile.name, path = %path.display(), "Saved user style");
        Ok(path)
    }

    /// Remove a user profile; built-ins cannot be deleted
    pub fn delete_user(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let path = self.user_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(style = name, "Deleted user style");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(format!("user style profile '{}'", name)))
            }
            Err(e) => Err(e.into()),
        }
    }
}
