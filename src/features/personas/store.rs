//! # Feature: Persona Store
//!
//! Owns every user's persona set. The relay pipeline only reads from it; the
//! command layer is the sole writer. `FilePersonaStore` keeps the whole book in
//! memory and rewrites its JSON file after each successful mutation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::record::PersonaRecord;

/// Owner id to that owner's personas, in registration order
type PersonaBook = BTreeMap<u64, Vec<PersonaRecord>>;

/// Outcome of [`PersonaStore::insert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    Added,
    /// The owner already has a persona with this name
    NameTaken,
    /// Another of the owner's personas answers to this trigger; carries its name
    TriggerTaken(String),
}

#[async_trait]
pub trait PersonaStore: Send + Sync {
    /// Snapshot of `owner`'s personas in registration order (possibly empty)
    async fn get_personas(&self, owner: u64) -> Result<Vec<PersonaRecord>>;

    /// Append a persona to the end of its owner's set, unless its name or
    /// trigger is already taken there. The check and the append are atomic.
    async fn insert(&self, record: PersonaRecord) -> Result<Insertion>;

    /// Replace the persona called `name` in place. Returns false if there is none.
    async fn replace(&self, owner: u64, name: &str, record: PersonaRecord) -> Result<bool>;

    async fn remove(&self, owner: u64, name: &str) -> Result<Option<PersonaRecord>>;
}

pub struct FilePersonaStore {
    path: Option<PathBuf>,
    book: RwLock<PersonaBook>,
}

impl FilePersonaStore {
    /// Load the store from `path`, creating an empty file if none exists.
    ///
    /// A file that exists but cannot be parsed is an error; it is never overwritten.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let book = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read persona file {}", path.display()))?;
            if contents.trim().is_empty() {
                PersonaBook::new()
            } else {
                serde_json::from_str::<PersonaBook>(&contents)
                    .with_context(|| format!("Persona file {} is not valid JSON", path.display()))?
            }
        } else {
            info!("📄 No persona file at {}, creating an empty one", path.display());
            let empty = PersonaBook::new();
            write_book(&path, &empty).await?;
            empty
        };

        let total: usize = book.values().map(Vec::len).sum();
        info!(
            "📚 Loaded {total} personas for {} users from {}",
            book.len(),
            path.display()
        );

        Ok(FilePersonaStore {
            path: Some(path),
            book: RwLock::new(book),
        })
    }

    /// A store with no backing file
    pub fn ephemeral() -> Self {
        FilePersonaStore {
            path: None,
            book: RwLock::new(PersonaBook::new()),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.book.read().await.len()
    }

    /// Apply `change` to a copy of the book, persist it, then publish it.
    ///
    /// The in-memory book only changes if the write succeeds. An unchanged book is not rewritten.
    async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut PersonaBook) -> Result<T>,
    {
        let mut guard = self.book.write().await;
        let mut next = guard.clone();
        let outcome = change(&mut next)?;
        if next == *guard {
            return Ok(outcome);
        }
        if let Some(path) = &self.path {
            write_book(path, &next).await?;
            debug!("💾 Persona file {} saved", path.display());
        }
        *guard = next;
        Ok(outcome)
    }
}

async fn write_book(path: &Path, book: &PersonaBook) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl PersonaStore for FilePersonaStore {
    async fn get_personas(&self, owner: u64) -> Result<Vec<PersonaRecord>> {
        Ok(self
            .book
            .read()
            .await
            .get(&owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(&self, record: PersonaRecord) -> Result<Insertion> {
        self.mutate(|book| {
            let set = book.entry(record.owner).or_default();
            if set.iter().any(|p| p.is_named(&record.name)) {
                return Ok(Insertion::NameTaken);
            }
            if let Some(clash) = set.iter().find(|p| p.has_trigger(&record.trigger)) {
                return Ok(Insertion::TriggerTaken(clash.name.clone()));
            }
            set.push(record);
            Ok(Insertion::Added)
        })
        .await
    }

    async fn replace(&self, owner: u64, name: &str, record: PersonaRecord) -> Result<bool> {
        if record.owner != owner {
            return Err(anyhow!("Cannot move a persona to another owner"));
        }
        self.mutate(|book| {
            let slot = book
                .get_mut(&owner)
                .and_then(|set| set.iter_mut().find(|p| p.is_named(name)));
            Ok(match slot {
                Some(existing) => {
                    *existing = record;
                    true
                }
                None => false,
            })
        })
        .await
    }

    async fn remove(&self, owner: u64, name: &str) -> Result<Option<PersonaRecord>> {
        self.mutate(|book| {
            let Some(set) = book.get_mut(&owner) else {
                return Ok(None);
            };
            let removed = set
                .iter()
                .position(|p| p.is_named(name))
                .map(|idx| set.remove(idx));
            if set.is_empty() {
                book.remove(&owner);
            }
            Ok(removed)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("echo-personas-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_insert_preserves_registration_order() {
        let store = FilePersonaStore::ephemeral();
        store.insert(PersonaRecord::new(1, "A", "a:", None)).await.unwrap();
        store.insert(PersonaRecord::new(1, "B", "b:", None)).await.unwrap();
        store.insert(PersonaRecord::new(2, "C", "c:", None)).await.unwrap();

        let names: Vec<_> = store
            .get_personas(1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(store.get_personas(3).await.unwrap().is_empty());
        assert_eq!(store.user_count().await, 2);
    }

    #[tokio::test]
    async fn test_insert_refuses_taken_name_or_trigger() {
        let store = FilePersonaStore::ephemeral();
        assert_eq!(
            store.insert(PersonaRecord::new(1, "Nyx", "Nx:", None)).await.unwrap(),
            Insertion::Added
        );
        assert_eq!(
            store.insert(PersonaRecord::new(1, "NYX", "other:", None)).await.unwrap(),
            Insertion::NameTaken
        );
        assert_eq!(
            store.insert(PersonaRecord::new(1, "Idh", "nx:", None)).await.unwrap(),
            Insertion::TriggerTaken("Nyx".to_string())
        );
        // Another owner may reuse both
        assert_eq!(
            store.insert(PersonaRecord::new(2, "Nyx", "Nx:", None)).await.unwrap(),
            Insertion::Added
        );
        assert_eq!(store.get_personas(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_keep_one_of_each_name() {
        let store = std::sync::Arc::new(FilePersonaStore::ephemeral());
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(PersonaRecord::new(1, "Nyx", format!("n{i}:"), None))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut added = 0;
        for task in tasks {
            if task.await.unwrap() == Insertion::Added {
                added += 1;
            }
        }
        assert_eq!(added, 1);
        assert_eq!(store.get_personas(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refused_insert_does_not_rewrite_file() {
        let path = temp_path();
        let store = FilePersonaStore::load(&path).await.unwrap();
        store.insert(PersonaRecord::new(9, "Nyx", "Nx:", None)).await.unwrap();
        std::fs::write(&path, "sentinel").unwrap();

        let outcome = store.insert(PersonaRecord::new(9, "nyx", "x:", None)).await.unwrap();
        assert_eq!(outcome, Insertion::NameTaken);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sentinel");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_replace_keeps_position() {
        let store = FilePersonaStore::ephemeral();
        store.insert(PersonaRecord::new(1, "A", "a:", None)).await.unwrap();
        store.insert(PersonaRecord::new(1, "B", "b:", None)).await.unwrap();

        let updated = PersonaRecord::new(1, "Alpha", "a:", None);
        assert!(store.replace(1, "a", updated).await.unwrap());
        assert!(!store
            .replace(1, "missing", PersonaRecord::new(1, "X", "x:", None))
            .await
            .unwrap());

        let set = store.get_personas(1).await.unwrap();
        assert_eq!(set[0].name, "Alpha");
        assert_eq!(set[1].name, "B");
    }

    #[tokio::test]
    async fn test_replace_rejects_owner_change() {
        let store = FilePersonaStore::ephemeral();
        store.insert(PersonaRecord::new(1, "A", "a:", None)).await.unwrap();
        assert!(store
            .replace(1, "A", PersonaRecord::new(2, "A", "a:", None))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = FilePersonaStore::ephemeral();
        store.insert(PersonaRecord::new(1, "A", "a:", None)).await.unwrap();

        assert!(store.remove(1, "nope").await.unwrap().is_none());
        let removed = store.remove(1, "A").await.unwrap().unwrap();
        assert_eq!(removed.trigger, "a:");
        assert!(store.get_personas(1).await.unwrap().is_empty());
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let path = temp_path();
        {
            let store = FilePersonaStore::load(&path).await.unwrap();
            let mut nyx = PersonaRecord::new(9, "Nyx", "Nx:", Some("https://example.com/a.png"));
            nyx.universe = Some("Starfall".to_string());
            store.insert(nyx).await.unwrap();
            store.insert(PersonaRecord::new(9, "Idh", "idh:", None)).await.unwrap();
        }

        let reloaded = FilePersonaStore::load(&path).await.unwrap();
        let set = reloaded.get_personas(9).await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].name, "Nyx");
        assert_eq!(set[0].universe.as_deref(), Some("Starfall"));
        assert_eq!(set[1].trigger, "idh:");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_missing_file_is_created() {
        let path = temp_path();
        let store = FilePersonaStore::load(&path).await.unwrap();
        assert_eq!(store.user_count().await, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error_and_untouched() {
        let path = temp_path();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(FilePersonaStore::load(&path).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
        let _ = std::fs::remove_file(&path);
    }
}
