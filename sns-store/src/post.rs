use std::sync::Arc;

use sns_client::{
    Comment, LikedChange, LikedPayload, NewComment, NewPost, Post, SnsApi, SnsClientResult,
};

/// Состояние ленты: посты, комментарии и флаг загрузки.
///
/// При ошибке любой асинхронной операции кэшированные коллекции
/// остаются прежними.
pub struct PostStore {
    api: Arc<dyn SnsApi>,
    // Как и в AuthStore, флаг не считает перекрывающиеся операции.
    loading: bool,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl PostStore {
    /// Создаёт store с внедрённым API-клиентом.
    pub fn new(api: Arc<dyn SnsApi>) -> Self {
        Self {
            api,
            loading: false,
            posts: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Идёт ли сейчас загрузка ленты.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Лента постов в порядке ответа сервера (порядок создания).
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Кэш комментариев.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Поднимает флаг загрузки.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Снимает флаг загрузки.
    pub fn end_loading(&mut self) {
        self.loading = false;
    }

    /// Загружает ленту, целиком замещая прежнюю (без слияния).
    pub async fn fetch_posts(&mut self) -> SnsClientResult<()> {
        let posts = self.api.posts().await?;
        self.posts = posts;
        Ok(())
    }

    /// Создаёт пост и возвращает его.
    ///
    /// Лента при этом не меняется: созданный пост появится в ней после
    /// очередного `fetch_posts`, либо вызывающая сторона добавляет его
    /// в своё представление сама.
    pub async fn create_post(&mut self, new_post: &NewPost) -> SnsClientResult<Post> {
        self.api.create_post(new_post).await
    }

    /// Переключает лайк текущего пользователя на посте.
    ///
    /// Исходящий список строится из `change` (см. [`liked_payload`]);
    /// при успехе запись ленты с тем же id целиком замещается ответом
    /// сервера, позиция в ленте сохраняется.
    pub async fn patch_liked(&mut self, change: &LikedChange) -> SnsClientResult<Post> {
        let payload = liked_payload(change);
        let updated = self.api.patch_liked(change.post_id, &payload).await?;

        if let Some(entry) = self.posts.iter_mut().find(|p| p.id == updated.id) {
            *entry = updated.clone();
        }
        Ok(updated)
    }

    /// Загружает комментарии, целиком замещая прежние (без слияния).
    pub async fn fetch_comments(&mut self) -> SnsClientResult<()> {
        let comments = self.api.comments().await?;
        self.comments = comments;
        Ok(())
    }

    /// Создаёт комментарий и возвращает его.
    ///
    /// Кэш комментариев не меняется — тот же контракт, что у
    /// [`PostStore::create_post`].
    pub async fn create_comment(&mut self, new_comment: &NewComment) -> SnsClientResult<Comment> {
        self.api.create_comment(new_comment).await
    }
}

/// Строит исходящее обновление списка лайков.
///
/// Если пользователь уже в списке — это снятие лайка, иначе — лайк.
/// Опустевший список отправляется полным обновлением с неизменённым
/// заголовком: частичное обновление с пустым списком сервер отвергает.
pub fn liked_payload(change: &LikedChange) -> LikedPayload {
    let mut liked: Vec<i64> = change
        .current
        .iter()
        .copied()
        .filter(|user_id| *user_id != change.acting_user_id)
        .collect();
    let already_liked = liked.len() != change.current.len();

    if !already_liked {
        liked.push(change.acting_user_id);
    }

    if liked.is_empty() {
        LikedPayload::Replace {
            liked,
            title: change.title.clone(),
        }
    } else {
        LikedPayload::Partial { liked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(current: Vec<i64>, acting_user_id: i64) -> LikedChange {
        LikedChange {
            post_id: 10,
            title: "first".to_string(),
            current,
            acting_user_id,
        }
    }

    #[test]
    fn unlike_of_sole_member_sends_full_replace_with_title() {
        let payload = liked_payload(&change(vec![7], 7));

        assert_eq!(
            payload,
            LikedPayload::Replace {
                liked: vec![],
                title: "first".to_string(),
            }
        );
    }

    #[test]
    fn unlike_with_remaining_members_sends_partial() {
        let payload = liked_payload(&change(vec![7, 9], 7));

        assert_eq!(payload, LikedPayload::Partial { liked: vec![9] });
    }

    #[test]
    fn like_appends_acting_user() {
        let payload = liked_payload(&change(vec![9], 7));

        assert_eq!(payload, LikedPayload::Partial { liked: vec![9, 7] });
    }

    #[test]
    fn like_on_empty_list_sends_partial() {
        let payload = liked_payload(&change(vec![], 7));

        assert_eq!(payload, LikedPayload::Partial { liked: vec![7] });
    }

    #[test]
    fn duplicate_entries_of_acting_user_are_all_removed() {
        // Дубликаты в исходном списке не должны пережить переключение.
        let payload = liked_payload(&change(vec![7, 9, 7], 7));

        assert_eq!(payload, LikedPayload::Partial { liked: vec![9] });
    }
}
