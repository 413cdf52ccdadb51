use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Имя файла с токеном по умолчанию.
pub const DEFAULT_TOKEN_FILE: &str = ".sns_token";

/// Долговременное хранилище JWT access-токена.
///
/// Хранилище живёт отдельно от store: клиент читает токен при каждом
/// защищённом запросе, auth-store записывает его после входа и удаляет
/// при выходе.
pub trait TokenStore: Send + Sync {
    /// Возвращает сохранённый токен, если он есть.
    fn load(&self) -> io::Result<Option<String>>;

    /// Сохраняет токен, заменяя предыдущий.
    fn save(&self, token: &str) -> io::Result<()>;

    /// Удаляет сохранённый токен.
    fn clear(&self) -> io::Result<()>;
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[derive(Debug, Clone)]
/// Хранилище токена в файле.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Создаёт хранилище с указанным путём к файлу токена.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Путь к файлу токена.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)?;
        Ok(parse_token_content(&raw))
    }

    fn save(&self, token: &str) -> io::Result<()> {
        std::fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)
    }
}

#[derive(Debug, Default)]
/// Хранилище токена в памяти; используется в тестах и при встраивании,
/// когда долговременное хранение не нужно.
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Создаёт пустое хранилище.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.token.lock().expect("token lock poisoned").clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.lock().expect("token lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.lock().expect("token lock poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_content_trims_whitespace() {
        let token = parse_token_content("  abc.def.ghi  ");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        assert!(parse_token_content("   ").is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let store = FileTokenStore::new(dir.path().join(DEFAULT_TOKEN_FILE));

        assert_eq!(store.load().expect("load must succeed"), None);

        store.save("abc.def.ghi").expect("save must succeed");
        assert_eq!(
            store.load().expect("load must succeed").as_deref(),
            Some("abc.def.ghi")
        );

        store.clear().expect("clear must succeed");
        assert_eq!(store.load().expect("load must succeed"), None);
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let store = FileTokenStore::new(dir.path().join(DEFAULT_TOKEN_FILE));

        store.clear().expect("clear of missing file must succeed");
        store.clear().expect("repeated clear must succeed");
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();

        assert_eq!(store.load().expect("load must succeed"), None);

        store.save("token").expect("save must succeed");
        assert_eq!(
            store.load().expect("load must succeed").as_deref(),
            Some("token")
        );

        store.clear().expect("clear must succeed");
        assert_eq!(store.load().expect("load must succeed"), None);
    }
}
