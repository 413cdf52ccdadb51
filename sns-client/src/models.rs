use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель профиля пользователя.
pub struct UserProfile {
    /// Идентификатор профиля.
    pub id: i64,
    /// Отображаемое имя (никнейм).
    pub nick_name: String,
    /// Идентификатор учётной записи, которой принадлежит профиль.
    pub user_id: i64,
    /// Дата и время создания профиля (UTC).
    pub created_on: DateTime<Utc>,
    /// URL аватара, если загружен.
    pub image_url: Option<String>,
}

impl Default for UserProfile {
    /// «Пустой» профиль: непустой `nick_name` служит признаком того,
    /// что пользователь аутентифицирован и профиль создан.
    fn default() -> Self {
        Self {
            id: 0,
            nick_name: String::new(),
            user_id: 0,
            created_on: DateTime::<Utc>::UNIX_EPOCH,
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Идентификатор учётной записи автора.
    pub author_id: i64,
    /// Дата и время создания поста (UTC).
    pub created_on: DateTime<Utc>,
    /// URL изображения поста, если загружено.
    pub image_url: Option<String>,
    /// Идентификаторы пользователей, поставивших лайк.
    ///
    /// Каждый идентификатор встречается не более одного раза; за это
    /// отвечает логика переключения лайка на стороне store.
    pub liked_by: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель комментария.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Текст комментария.
    pub text: String,
    /// Идентификатор учётной записи автора.
    pub author_id: i64,
    /// Идентификатор поста, к которому относится комментарий.
    pub post_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пара JWT-токенов, возвращаемая после успешного входа.
pub struct AuthTokens {
    /// Access-токен; он сохраняется в `TokenStore` и прикладывается
    /// к каждому защищённому запросу.
    pub access: String,
    /// Refresh-токен; сервер выдаёт его вместе с access-токеном.
    pub refresh: String,
}

#[derive(Debug, Clone)]
/// Учётные данные для регистрации и входа.
pub struct Credentials {
    /// Email пользователя.
    pub email: String,
    /// Пароль.
    pub password: String,
}

#[derive(Debug, Clone)]
/// Загружаемый файл изображения.
pub struct ImageFile {
    /// Имя файла, передаваемое в multipart-части.
    pub file_name: String,
    /// Содержимое файла.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
/// Данные для обновления профиля.
pub struct ProfileUpdate {
    /// Идентификатор обновляемого профиля.
    pub id: i64,
    /// Новый никнейм.
    pub nick_name: String,
    /// Новый аватар; `None` — оставить без изменений.
    pub image: Option<ImageFile>,
}

#[derive(Debug, Clone)]
/// Данные нового поста.
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Изображение поста, если есть.
    pub image: Option<ImageFile>,
}

#[derive(Debug, Clone)]
/// Данные нового комментария.
pub struct NewComment {
    /// Текст комментария.
    pub text: String,
    /// Идентификатор поста.
    pub post_id: i64,
}

#[derive(Debug, Clone)]
/// Входные данные переключения лайка.
pub struct LikedChange {
    /// Идентификатор поста.
    pub post_id: i64,
    /// Текущий заголовок поста; нужен для полного обновления,
    /// когда список лайков становится пустым.
    pub title: String,
    /// Текущий список лайкнувших пользователей.
    pub current: Vec<i64>,
    /// Пользователь, нажавший лайк.
    pub acting_user_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
/// Исходящее обновление списка лайков.
///
/// Сервер не принимает частичное обновление с пустым списком, поэтому
/// опустевший список отправляется полным обновлением вместе с `title`.
pub enum LikedPayload {
    /// Частичное обновление (PATCH): только список лайков.
    Partial {
        /// Новый список лайкнувших пользователей.
        liked: Vec<i64>,
    },
    /// Полное обновление (PUT): список лайков и неизменённый заголовок.
    Replace {
        /// Новый список лайкнувших пользователей (возможно пустой).
        liked: Vec<i64>,
        /// Текущий заголовок поста.
        title: String,
    },
}
