use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{ProfileDefinition, ProfileError};

// ======================================================
// STORE
// ======================================================

/// Directory of named profile definitions, one `<name>.yaml` per profile.
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// `~/.rspecgen/profiles`.
    pub fn default_dir() -> Result<PathBuf, ProfileError> {
        let home = dirs::home_dir().ok_or(ProfileError::NoHome)?;
        Ok(home.join(".rspecgen").join("profiles"))
    }

    pub fn open(dir: Option<PathBuf>) -> Result<Self, ProfileError> {
        let dir = match dir {
            Some(dir) => dir,
            None => Self::default_dir()?,
        };
        Ok(ProfileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> Result<PathBuf, ProfileError> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(|c: char| c == '/' || c == '\\' || c.is_whitespace())
        {
            return Err(ProfileError::InvalidName(name.to_owned()));
        }
        Ok(self.dir.join(format!("{}.yaml", name)))
    }

    fn ensure_dir(&self) -> Result<(), ProfileError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| ProfileError::Write {
                path: self.dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    // ======================================================
    // LOOKUP
    // ======================================================

    /// A stored profile by name, or `None` if absent.
    pub fn load(&self, name: &str) -> Result<Option<ProfileDefinition>, ProfileError> {
        let path = self.path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        ProfileDefinition::load(&path).map(Some)
    }

    /// Treat `spec` as a file path if one exists, otherwise as a stored name.
    pub fn resolve(&self, spec: &str) -> Result<ProfileDefinition, ProfileError> {
        let as_path = Path::new(spec);
        if as_path.is_file() {
            debug!(path = %as_path.display(), "resolved profile as file");
            return ProfileDefinition::load(as_path);
        }

        match self.path(spec) {
            Ok(_) => self
                .load(spec)?
                .ok_or_else(|| ProfileError::NotFound(spec.to_owned())),
            Err(_) => Err(ProfileError::NotFound(spec.to_owned())),
        }
    }

    /// Stored profile names, sorted.
    pub fn list(&self) -> Result<Vec<String>, ProfileError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|source| ProfileError::Read {
            path: self.dir.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|ext| ext == "yaml").unwrap_or(false))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();

        names.sort();
        Ok(names)
    }

    // ======================================================
    // MUTATION
    // ======================================================

    /// Store a definition under `name`, replacing any existing one.
    /// The definition must describe a valid request.
    pub fn save(&self, name: &str, definition: &ProfileDefinition) -> Result<PathBuf, ProfileError> {
        definition.clone().into_request().validate()?;

        let path = self.path(name)?;
        self.ensure_dir()?;
        definition.save(&path)?;

        info!(profile = name, path = %path.display(), "profile stored");
        Ok(path)
    }

    /// Copy a definition file into the store.
    pub fn import(&self, name: &str, file: &Path) -> Result<PathBuf, ProfileError> {
        let definition = ProfileDefinition::load(file)?;
        self.save(name, &definition)
    }

    /// Returns whether anything was removed.
    pub fn delete(&self, name: &str) -> Result<bool, ProfileError> {
        let path = self.path(name)?;

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).map_err(|source| ProfileError::Write {
            path: path.clone(),
            source,
        })?;

        info!(profile = name, "profile deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::hello_world_cluster;
    use crate::rspec::RspecError;

    fn store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(Some(dir.path().join("profiles"))).unwrap();
        (dir, store)
    }

    fn hello() -> ProfileDefinition {
        ProfileDefinition::from_request(&hello_world_cluster())
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn save_list_load_delete() {
        let (_dir, store) = store();

        store.save("zeta", &hello()).unwrap();
        store.save("alpha", &hello()).unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
        assert_eq!(store.load("alpha").unwrap(), Some(hello()));

        assert!(store.delete("alpha").unwrap());
        assert!(!store.delete("alpha").unwrap());
        assert_eq!(store.list().unwrap(), vec!["zeta"]);
    }

    #[test]
    fn invalid_definitions_are_not_stored() {
        let (_dir, store) = store();
        let mut def = hello();
        def.nodes[0].blockstores[0].mount = "mydata".to_owned();

        let err = store.save("bad", &def).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::Invalid(RspecError::RelativeMount { .. })
        ));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn names_cannot_escape_the_store() {
        let (_dir, store) = store();
        for name in ["", "../etc", ".hidden", "a/b", "two words"] {
            assert!(matches!(
                store.save(name, &hello()),
                Err(ProfileError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn resolve_prefers_files_then_names() {
        let (dir, store) = store();

        let file = dir.path().join("custom.yaml");
        hello().save(&file).unwrap();
        assert_eq!(store.resolve(file.to_str().unwrap()).unwrap(), hello());

        store.import("stored", &file).unwrap();
        assert_eq!(store.resolve("stored").unwrap(), hello());

        assert!(matches!(
            store.resolve("nowhere"),
            Err(ProfileError::NotFound(_))
        ));
    }
}
