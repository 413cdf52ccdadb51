use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{SnsClientError, SnsClientResult};
use crate::models::{
    AuthTokens, Comment, LikedPayload, NewComment, NewPost, Post, ProfileUpdate, UserProfile,
};

#[derive(Debug, Serialize)]
struct CredentialsDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateProfileDto<'a> {
    #[serde(rename = "nickName")]
    nick_name: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateCommentDto<'a> {
    text: &'a str,
    post: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthTokensDto {
    access: String,
    refresh: String,
}

#[derive(Debug, Deserialize)]
struct ProfileDto {
    id: i64,
    #[serde(rename = "nickName")]
    nick_name: String,
    #[serde(rename = "userProfile")]
    user_profile: i64,
    created_on: DateTime<Utc>,
    img: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostDto {
    id: i64,
    title: String,
    #[serde(rename = "userPost")]
    user_post: i64,
    created_on: DateTime<Utc>,
    img: Option<String>,
    liked: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct CommentDto {
    id: i64,
    text: String,
    #[serde(rename = "userComment")]
    user_comment: i64,
    post: i64,
}

impl From<AuthTokensDto> for AuthTokens {
    fn from(value: AuthTokensDto) -> Self {
        Self {
            access: value.access,
            refresh: value.refresh,
        }
    }
}

impl From<ProfileDto> for UserProfile {
    fn from(value: ProfileDto) -> Self {
        Self {
            id: value.id,
            nick_name: value.nick_name,
            user_id: value.user_profile,
            created_on: value.created_on,
            image_url: value.img,
        }
    }
}

impl From<PostDto> for Post {
    fn from(value: PostDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            author_id: value.user_post,
            created_on: value.created_on,
            image_url: value.img,
            liked_by: value.liked,
        }
    }
}

impl From<CommentDto> for Comment {
    fn from(value: CommentDto) -> Self {
        Self {
            id: value.id,
            text: value.text,
            author_id: value.user_comment,
            post_id: value.post,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API SNS-бэкенда.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> SnsClientError {
        let status = response.status();

        let message = match response.text().await {
            Ok(raw) => serde_json::from_str::<ErrorResponseDto>(&raw)
                .ok()
                .and_then(|body| body.detail)
                .or_else(|| {
                    let raw = raw.trim().to_string();
                    if raw.is_empty() { None } else { Some(raw) }
                }),
            Err(_) => None,
        };
        SnsClientError::from_http_status(status, message)
    }

    /// Django-бэкенд ожидает схему `JWT`, а не `Bearer`.
    fn with_auth(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("JWT {token}"))
    }

    /// универсальный helper для отправки запросов с json-payload
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> SnsClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%method, path, "sns api json request");

        let mut request = self.client.request(method, url).json(body);
        if let Some(token) = token {
            request = Self::with_auth(request, token);
        }

        let response = request.send().await.map_err(SnsClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(SnsClientError::from_reqwest)
    }

    /// helper для multipart-запросов (загрузка изображений, список лайков)
    async fn send_multipart<TRes>(
        &self,
        method: Method,
        path: &str,
        form: Form,
        token: &str,
    ) -> SnsClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%method, path, "sns api multipart request");

        let request = Self::with_auth(self.client.request(method, url), token).multipart(form);

        let response = request.send().await.map_err(SnsClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(SnsClientError::from_reqwest)
    }

    async fn get_json<TRes>(&self, path: &str, token: &str) -> SnsClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(path, "sns api get request");

        let request = Self::with_auth(self.client.request(Method::GET, url), token);

        let response = request.send().await.map_err(SnsClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(SnsClientError::from_reqwest)
    }

    /// Выполняет вход и возвращает пару JWT-токенов.
    pub(crate) async fn login(&self, email: &str, password: &str) -> SnsClientResult<AuthTokens> {
        let payload = CredentialsDto { email, password };
        let dto: AuthTokensDto = self
            .send_json(Method::POST, "/authen/jwt/create", &payload, None)
            .await?;
        Ok(dto.into())
    }

    /// Регистрирует пользователя. Тело ответа не используется.
    pub(crate) async fn register(&self, email: &str, password: &str) -> SnsClientResult<()> {
        let payload = CredentialsDto { email, password };
        let url = self.endpoint("/api/register/");
        debug!("sns api register request");

        let request = self.client.request(Method::POST, url).json(&payload);

        let response = request.send().await.map_err(SnsClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(())
    }

    /// Создаёт профиль текущего пользователя.
    pub(crate) async fn create_profile(
        &self,
        token: &str,
        nick_name: &str,
    ) -> SnsClientResult<UserProfile> {
        let payload = CreateProfileDto { nick_name };
        let dto: ProfileDto = self
            .send_json(Method::POST, "/api/profile/", &payload, Some(token))
            .await?;
        Ok(dto.into())
    }

    /// Обновляет профиль: никнейм и, при наличии, аватар.
    pub(crate) async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> SnsClientResult<UserProfile> {
        let mut form = Form::new().text("nickName", update.nick_name.clone());
        if let Some(image) = &update.image {
            let part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
            form = form.part("img", part);
        }

        let dto: ProfileDto = self
            .send_multipart(
                Method::PUT,
                &format!("/api/profile/{}/", update.id),
                form,
                token,
            )
            .await?;
        Ok(dto.into())
    }

    /// Возвращает профиль текущего пользователя.
    ///
    /// Сервер отдаёт массив из одного элемента; пустой массив означает,
    /// что профиль ещё не создан.
    pub(crate) async fn my_profile(&self, token: &str) -> SnsClientResult<UserProfile> {
        let dtos: Vec<ProfileDto> = self.get_json("/api/myprofile/", token).await?;
        let dto = dtos.into_iter().next().ok_or(SnsClientError::NotFound)?;
        Ok(dto.into())
    }

    /// Возвращает профили всех пользователей.
    pub(crate) async fn all_profiles(&self, token: &str) -> SnsClientResult<Vec<UserProfile>> {
        let dtos: Vec<ProfileDto> = self.get_json("/api/profile/", token).await?;
        Ok(dtos.into_iter().map(UserProfile::from).collect())
    }

    /// Возвращает ленту постов в порядке создания.
    pub(crate) async fn posts(&self, token: &str) -> SnsClientResult<Vec<Post>> {
        let dtos: Vec<PostDto> = self.get_json("/api/post/", token).await?;
        Ok(dtos.into_iter().map(Post::from).collect())
    }

    /// Создаёт пост с заголовком и, при наличии, изображением.
    pub(crate) async fn create_post(&self, token: &str, new_post: &NewPost) -> SnsClientResult<Post> {
        let mut form = Form::new().text("title", new_post.title.clone());
        if let Some(image) = &new_post.image {
            let part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
            form = form.part("img", part);
        }

        let dto: PostDto = self
            .send_multipart(Method::POST, "/api/post/", form, token)
            .await?;
        Ok(dto.into())
    }

    /// Отправляет обновление списка лайков.
    ///
    /// Частичное обновление уходит PATCH-запросом, полное (с заголовком) —
    /// PUT-запросом; выбор делает вызывающая сторона через `LikedPayload`.
    pub(crate) async fn patch_liked(
        &self,
        token: &str,
        post_id: i64,
        payload: &LikedPayload,
    ) -> SnsClientResult<Post> {
        let path = format!("/api/post/{post_id}/");

        let (method, form) = match payload {
            LikedPayload::Partial { liked } => (Method::PATCH, liked_form(liked)),
            LikedPayload::Replace { liked, title } => {
                (Method::PUT, liked_form(liked).text("title", title.clone()))
            }
        };

        let dto: PostDto = self.send_multipart(method, &path, form, token).await?;
        Ok(dto.into())
    }

    /// Возвращает все комментарии.
    pub(crate) async fn comments(&self, token: &str) -> SnsClientResult<Vec<Comment>> {
        let dtos: Vec<CommentDto> = self.get_json("/api/comment/", token).await?;
        Ok(dtos.into_iter().map(Comment::from).collect())
    }

    /// Создаёт комментарий к посту.
    pub(crate) async fn create_comment(
        &self,
        token: &str,
        new_comment: &NewComment,
    ) -> SnsClientResult<Comment> {
        let payload = CreateCommentDto {
            text: &new_comment.text,
            post: new_comment.post_id,
        };
        let dto: CommentDto = self
            .send_json(Method::POST, "/api/comment/", &payload, Some(token))
            .await?;
        Ok(dto.into())
    }
}

fn liked_form(liked: &[i64]) -> Form {
    let mut form = Form::new();
    for user_id in liked {
        form = form.text("liked", user_id.to_string());
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:8000/");
        let full = client.endpoint("/api/post/");
        assert_eq!(full, "http://localhost:8000/api/post/");
    }

    #[test]
    fn profile_dto_maps_wire_names() {
        let raw = r#"{
            "id": 3,
            "nickName": "anonymous",
            "userProfile": 7,
            "created_on": "2026-01-01T00:00:00Z",
            "img": null
        }"#;

        let dto: ProfileDto = serde_json::from_str(raw).expect("profile dto must parse");
        let profile = UserProfile::from(dto);

        assert_eq!(profile.id, 3);
        assert_eq!(profile.nick_name, "anonymous");
        assert_eq!(profile.user_id, 7);
        assert_eq!(profile.image_url, None);
    }

    #[test]
    fn post_dto_maps_wire_names_and_liked_list() {
        let raw = r#"{
            "id": 10,
            "title": "first",
            "userPost": 7,
            "created_on": "2026-01-02T12:30:00Z",
            "img": "http://localhost:8000/media/posts/first.png",
            "liked": [7, 9]
        }"#;

        let dto: PostDto = serde_json::from_str(raw).expect("post dto must parse");
        let post = Post::from(dto);

        assert_eq!(post.id, 10);
        assert_eq!(post.author_id, 7);
        assert_eq!(post.liked_by, vec![7, 9]);
        assert_eq!(
            post.image_url.as_deref(),
            Some("http://localhost:8000/media/posts/first.png")
        );
    }

    #[test]
    fn comment_dto_maps_wire_names() {
        let raw = r#"{"id": 1, "text": "nice", "userComment": 9, "post": 10}"#;

        let dto: CommentDto = serde_json::from_str(raw).expect("comment dto must parse");
        let comment = Comment::from(dto);

        assert_eq!(comment.id, 1);
        assert_eq!(comment.text, "nice");
        assert_eq!(comment.author_id, 9);
        assert_eq!(comment.post_id, 10);
    }

    #[test]
    fn error_body_prefers_detail_field() {
        let raw = r#"{"detail": "Учётные данные не были предоставлены."}"#;
        let body: ErrorResponseDto = serde_json::from_str(raw).expect("error dto must parse");
        assert_eq!(
            body.detail.as_deref(),
            Some("Учётные данные не были предоставлены.")
        );
    }
}
