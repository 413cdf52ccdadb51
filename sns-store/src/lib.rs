//! Централизованное клиентское состояние SNS-приложения.
//!
//! Два store («auth» и «post») кэшируют ответы сервера и меняются только
//! из своих операций; сетевые вызовы идут через трейт `SnsApi`, поэтому
//! в тестах транспорт подменяется mock-реализацией.
//!
//! Контейнер [`SnsStore`] создаётся композиционным корнем приложения и
//! передаётся явно — скрытых синглтонов нет.

mod auth;
mod bootstrap;
mod post;
mod ui;

pub use auth::AuthStore;
pub use bootstrap::{BootstrapError, BootstrapStep};
pub use post::{PostStore, liked_payload};
pub use ui::ActiveModal;

use std::sync::Arc;

use sns_client::{SnsApi, TokenStore};

/// Корневой контейнер состояния: auth-store, post-store и активный
/// модальный диалог.
pub struct SnsStore {
    /// Состояние аутентификации и профилей.
    pub auth: AuthStore,
    /// Состояние ленты и комментариев.
    pub post: PostStore,
    modal: ActiveModal,
}

impl SnsStore {
    /// Создаёт контейнер с внедрёнными API-клиентом и хранилищем токена.
    pub fn new(api: Arc<dyn SnsApi>, session: Arc<dyn TokenStore>) -> Self {
        Self {
            auth: AuthStore::new(Arc::clone(&api), session),
            post: PostStore::new(api),
            modal: ActiveModal::None,
        }
    }

    /// Текущий активный модальный диалог.
    pub fn active_modal(&self) -> ActiveModal {
        self.modal
    }

    /// Открывает диалог входа (любой другой диалог закрывается).
    pub fn show_sign_in(&mut self) {
        self.modal.open(ActiveModal::SignIn);
    }

    /// Закрывает диалог входа, если он открыт.
    pub fn hide_sign_in(&mut self) {
        self.modal.close(ActiveModal::SignIn);
    }

    /// Открывает диалог регистрации.
    pub fn show_sign_up(&mut self) {
        self.modal.open(ActiveModal::SignUp);
    }

    /// Закрывает диалог регистрации, если он открыт.
    pub fn hide_sign_up(&mut self) {
        self.modal.close(ActiveModal::SignUp);
    }

    /// Открывает редактор профиля.
    pub fn show_profile_editor(&mut self) {
        self.modal.open(ActiveModal::ProfileEditor);
    }

    /// Закрывает редактор профиля, если он открыт.
    pub fn hide_profile_editor(&mut self) {
        self.modal.close(ActiveModal::ProfileEditor);
    }

    /// Открывает диалог создания поста.
    pub fn show_new_post_editor(&mut self) {
        self.modal.open(ActiveModal::NewPost);
    }

    /// Закрывает диалог создания поста, если он открыт.
    pub fn hide_new_post_editor(&mut self) {
        self.modal.close(ActiveModal::NewPost);
    }
}
