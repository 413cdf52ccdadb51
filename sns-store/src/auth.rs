use std::sync::Arc;

use sns_client::{
    AuthTokens, Credentials, ProfileUpdate, SnsApi, SnsClientResult, TokenStore, UserProfile,
};
use tracing::debug;

/// Состояние аутентификации: «мой» профиль, реестр всех профилей
/// и флаг загрузки.
///
/// Все асинхронные операции применяют результат к состоянию только после
/// успешного ответа сервера; при ошибке состояние остаётся прежним.
pub struct AuthStore {
    api: Arc<dyn SnsApi>,
    session: Arc<dyn TokenStore>,
    // Флаг не считает вложенные операции: из двух перекрывающихся операций
    // флаг снимет та, что завершится первой.
    loading: bool,
    my_profile: UserProfile,
    profiles: Vec<UserProfile>,
}

impl AuthStore {
    /// Создаёт store с внедрёнными API-клиентом и хранилищем токена.
    pub fn new(api: Arc<dyn SnsApi>, session: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            session,
            loading: false,
            my_profile: UserProfile::default(),
            profiles: Vec::new(),
        }
    }

    /// Идёт ли сейчас загрузка, связанная с аутентификацией.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Профиль текущего пользователя.
    ///
    /// Непустой `nick_name` — признак «аутентифицирован и профиль создан».
    pub fn my_profile(&self) -> &UserProfile {
        &self.my_profile
    }

    /// Реестр всех известных профилей в порядке ответа сервера.
    pub fn profiles(&self) -> &[UserProfile] {
        &self.profiles
    }

    /// Поднимает флаг загрузки.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Снимает флаг загрузки.
    pub fn end_loading(&mut self) {
        self.loading = false;
    }

    /// Меняет никнейм «моего» профиля локально, без обращения к серверу.
    pub fn set_my_nickname(&mut self, nick_name: impl Into<String>) {
        self.my_profile.nick_name = nick_name.into();
    }

    /// Удаляет сохранённый токен. Кэшированные профили не очищаются.
    pub fn logout(&self) -> SnsClientResult<()> {
        self.session.clear()?;
        debug!("session token cleared");
        Ok(())
    }

    /// Выполняет вход и сохраняет access-токен в хранилище.
    ///
    /// Остальные поля состояния не меняются: последующие fetch-операции
    /// запускает вызывающая сторона.
    pub async fn login(&mut self, creds: &Credentials) -> SnsClientResult<AuthTokens> {
        let tokens = self.api.login(creds).await?;
        self.session.save(&tokens.access)?;
        debug!("session token persisted");
        Ok(tokens)
    }

    /// Регистрирует пользователя. Состояние не меняется.
    pub async fn register(&mut self, creds: &Credentials) -> SnsClientResult<()> {
        self.api.register(creds).await
    }

    /// Создаёт профиль и целиком замещает им «мой» профиль.
    pub async fn create_profile(&mut self, nick_name: &str) -> SnsClientResult<()> {
        let profile = self.api.create_profile(nick_name).await?;
        self.my_profile = profile;
        Ok(())
    }

    /// Загружает «мой» профиль и целиком замещает им прежнее значение.
    pub async fn fetch_my_profile(&mut self) -> SnsClientResult<()> {
        let profile = self.api.my_profile().await?;
        self.my_profile = profile;
        Ok(())
    }

    /// Загружает реестр профилей, целиком замещая прежний (без слияния).
    pub async fn fetch_all_profiles(&mut self) -> SnsClientResult<()> {
        let profiles = self.api.all_profiles().await?;
        self.profiles = profiles;
        Ok(())
    }

    /// Обновляет профиль на сервере, замещает «мой» профиль ответом и
    /// заменяет совпадающую по id запись реестра, сохраняя порядок и
    /// остальные записи.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> SnsClientResult<()> {
        let profile = self.api.update_profile(update).await?;

        if let Some(entry) = self.profiles.iter_mut().find(|p| p.id == profile.id) {
            *entry = profile.clone();
        }
        self.my_profile = profile;
        Ok(())
    }
}
