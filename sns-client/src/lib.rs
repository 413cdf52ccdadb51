//! Клиентская библиотека для работы с SNS-бэкендом по HTTP.
//!
//! Предоставляет типизированный API (`SnsClient`) поверх REST-эндпоинтов
//! бэкенда: аутентификация, профили, посты, лайки и комментарии.
//!
//! JWT-токен живёт во внешнем хранилище (`TokenStore`) и читается из него
//! при каждом защищённом запросе; клиент не держит отдельной копии токена
//! в памяти.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;
mod session;

pub use error::{SnsClientError, SnsClientResult};
pub use models::{
    AuthTokens, Comment, Credentials, ImageFile, LikedChange, LikedPayload, NewComment, NewPost,
    Post, ProfileUpdate, UserProfile,
};
pub use session::{DEFAULT_TOKEN_FILE, FileTokenStore, MemoryTokenStore, TokenStore};

use std::sync::Arc;

use async_trait::async_trait;

use http_client::HttpClient;

/// Операции SNS-бэкенда, доступные слою store.
///
/// Store работает с API только через этот трейт, поэтому в тестах клиент
/// подменяется mock-реализацией без сети.
#[async_trait]
pub trait SnsApi: Send + Sync {
    /// Выполняет вход и возвращает пару JWT-токенов.
    async fn login(&self, creds: &Credentials) -> SnsClientResult<AuthTokens>;

    /// Регистрирует нового пользователя.
    async fn register(&self, creds: &Credentials) -> SnsClientResult<()>;

    /// Создаёт профиль текущего пользователя.
    async fn create_profile(&self, nick_name: &str) -> SnsClientResult<UserProfile>;

    /// Обновляет профиль текущего пользователя.
    async fn update_profile(&self, update: &ProfileUpdate) -> SnsClientResult<UserProfile>;

    /// Возвращает профиль текущего пользователя.
    async fn my_profile(&self) -> SnsClientResult<UserProfile>;

    /// Возвращает профили всех пользователей.
    async fn all_profiles(&self) -> SnsClientResult<Vec<UserProfile>>;

    /// Возвращает ленту постов.
    async fn posts(&self) -> SnsClientResult<Vec<Post>>;

    /// Создаёт новый пост.
    async fn create_post(&self, new_post: &NewPost) -> SnsClientResult<Post>;

    /// Отправляет обновление списка лайков поста.
    async fn patch_liked(&self, post_id: i64, payload: &LikedPayload) -> SnsClientResult<Post>;

    /// Возвращает все комментарии.
    async fn comments(&self) -> SnsClientResult<Vec<Comment>>;

    /// Создаёт комментарий к посту.
    async fn create_comment(&self, new_comment: &NewComment) -> SnsClientResult<Comment>;
}

#[derive(Clone)]
/// Клиент SNS-бэкенда: HTTP-транспорт плюс хранилище токена.
pub struct SnsClient {
    http: HttpClient,
    session: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for SnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnsClient")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl SnsClient {
    /// Создаёт клиент с базовым URL сервера и хранилищем токена.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn TokenStore>) -> Self {
        Self {
            http: HttpClient::new(base_url),
            session,
        }
    }

    /// Хранилище токена, с которым работает клиент.
    pub fn session(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.session)
    }

    fn require_token(&self) -> SnsClientResult<String> {
        self.session.load()?.ok_or(SnsClientError::Unauthorized)
    }
}

#[async_trait]
impl SnsApi for SnsClient {
    async fn login(&self, creds: &Credentials) -> SnsClientResult<AuthTokens> {
        self.http.login(&creds.email, &creds.password).await
    }

    async fn register(&self, creds: &Credentials) -> SnsClientResult<()> {
        self.http.register(&creds.email, &creds.password).await
    }

    async fn create_profile(&self, nick_name: &str) -> SnsClientResult<UserProfile> {
        let token = self.require_token()?;
        self.http.create_profile(&token, nick_name).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> SnsClientResult<UserProfile> {
        let token = self.require_token()?;
        self.http.update_profile(&token, update).await
    }

    async fn my_profile(&self) -> SnsClientResult<UserProfile> {
        let token = self.require_token()?;
        self.http.my_profile(&token).await
    }

    async fn all_profiles(&self) -> SnsClientResult<Vec<UserProfile>> {
        let token = self.require_token()?;
        self.http.all_profiles(&token).await
    }

    async fn posts(&self) -> SnsClientResult<Vec<Post>> {
        let token = self.require_token()?;
        self.http.posts(&token).await
    }

    async fn create_post(&self, new_post: &NewPost) -> SnsClientResult<Post> {
        let token = self.require_token()?;
        self.http.create_post(&token, new_post).await
    }

    async fn patch_liked(&self, post_id: i64, payload: &LikedPayload) -> SnsClientResult<Post> {
        let token = self.require_token()?;
        self.http.patch_liked(&token, post_id, payload).await
    }

    async fn comments(&self) -> SnsClientResult<Vec<Comment>> {
        let token = self.require_token()?;
        self.http.comments(&token).await
    }

    async fn create_comment(&self, new_comment: &NewComment) -> SnsClientResult<Comment> {
        let token = self.require_token()?;
        self.http.create_comment(&token, new_comment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn authenticated_call_without_token_fails_before_network() {
        // базовый URL заведомо недостижим: до сети дело дойти не должно
        let client = SnsClient::new(
            "http://127.0.0.1:1",
            Arc::new(MemoryTokenStore::new()),
        );

        let result = client.posts().await;
        assert!(matches!(result, Err(SnsClientError::Unauthorized)));
    }
}
