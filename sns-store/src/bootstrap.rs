use std::fmt;

use sns_client::{Credentials, SnsClientError, SnsClientResult};
use thiserror::Error;
use tracing::debug;

use crate::SnsStore;

/// Шаг bootstrap-последовательности.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    /// Регистрация учётной записи.
    Register,
    /// Вход и сохранение токена.
    Login,
    /// Создание профиля.
    CreateProfile,
    /// Загрузка реестра профилей.
    FetchProfiles,
    /// Загрузка «моего» профиля.
    FetchMyProfile,
    /// Загрузка ленты постов.
    FetchPosts,
    /// Загрузка комментариев.
    FetchComments,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::CreateProfile => "create profile",
            Self::FetchProfiles => "fetch profiles",
            Self::FetchMyProfile => "fetch my profile",
            Self::FetchPosts => "fetch posts",
            Self::FetchComments => "fetch comments",
        };
        f.write_str(name)
    }
}

/// Ошибка bootstrap-последовательности: первый отказавший шаг и его причина.
///
/// Шаги, выполненные до отказа, не откатываются: уже сохранённый токен
/// остаётся в хранилище.
#[derive(Debug, Error)]
#[error("bootstrap failed at step `{step}`: {source}")]
pub struct BootstrapError {
    /// Шаг, на котором последовательность остановилась.
    pub step: BootstrapStep,
    /// Исходная ошибка клиента.
    #[source]
    pub source: SnsClientError,
}

fn at<T>(step: BootstrapStep, result: SnsClientResult<T>) -> Result<T, BootstrapError> {
    result.map_err(|source| BootstrapError { step, source })
}

impl SnsStore {
    /// Полная последовательность регистрации:
    /// register → login → create-profile → fetch-roster → fetch-my-profile.
    ///
    /// Первый отказавший шаг останавливает остальные; флаг загрузки auth
    /// снимается и при успехе, и при ошибке.
    pub async fn sign_up(
        &mut self,
        creds: &Credentials,
        nick_name: &str,
    ) -> Result<(), BootstrapError> {
        debug!("sign-up bootstrap started");
        self.auth.begin_loading();
        let result = self.sign_up_steps(creds, nick_name).await;
        self.auth.end_loading();
        result
    }

    async fn sign_up_steps(
        &mut self,
        creds: &Credentials,
        nick_name: &str,
    ) -> Result<(), BootstrapError> {
        at(BootstrapStep::Register, self.auth.register(creds).await)?;
        at(BootstrapStep::Login, self.auth.login(creds).await)?;
        at(
            BootstrapStep::CreateProfile,
            self.auth.create_profile(nick_name).await,
        )?;
        at(
            BootstrapStep::FetchProfiles,
            self.auth.fetch_all_profiles().await,
        )?;
        at(
            BootstrapStep::FetchMyProfile,
            self.auth.fetch_my_profile().await,
        )?;
        Ok(())
    }

    /// Последовательность входа: login → fetch-roster → fetch-my-profile.
    pub async fn sign_in(&mut self, creds: &Credentials) -> Result<(), BootstrapError> {
        debug!("sign-in bootstrap started");
        self.auth.begin_loading();
        let result = self.sign_in_steps(creds).await;
        self.auth.end_loading();
        result
    }

    async fn sign_in_steps(&mut self, creds: &Credentials) -> Result<(), BootstrapError> {
        at(BootstrapStep::Login, self.auth.login(creds).await)?;
        at(
            BootstrapStep::FetchProfiles,
            self.auth.fetch_all_profiles().await,
        )?;
        at(
            BootstrapStep::FetchMyProfile,
            self.auth.fetch_my_profile().await,
        )?;
        Ok(())
    }

    /// Стартовая последовательность при наличии сохранённого токена.
    ///
    /// Загрузка «моего» профиля служит проверкой токена: если она
    /// отказала, остальные шаги не выполняются и вызывающая сторона
    /// показывает диалог входа. Дальше: лента → реестр → комментарии.
    pub async fn startup(&mut self) -> Result<(), BootstrapError> {
        debug!("startup bootstrap started");
        self.auth.begin_loading();
        let gate = at(
            BootstrapStep::FetchMyProfile,
            self.auth.fetch_my_profile().await,
        );
        self.auth.end_loading();
        gate?;

        self.post.begin_loading();
        let result = self.startup_feed_steps().await;
        self.post.end_loading();
        result
    }

    async fn startup_feed_steps(&mut self) -> Result<(), BootstrapError> {
        at(BootstrapStep::FetchPosts, self.post.fetch_posts().await)?;
        at(
            BootstrapStep::FetchProfiles,
            self.auth.fetch_all_profiles().await,
        )?;
        at(
            BootstrapStep::FetchComments,
            self.post.fetch_comments().await,
        )?;
        Ok(())
    }
}
