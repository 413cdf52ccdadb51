use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sns_client::{
    Credentials, LikedPayload, MemoryTokenStore, NewComment, NewPost, ProfileUpdate, SnsApi,
    SnsClient, TokenStore,
};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

#[tokio::test]
#[ignore = "requires running SNS backend"]
async fn http_smoke_flow() {
    let base_url =
        std::env::var("SNS_API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let session = Arc::new(MemoryTokenStore::new());
    let client = SnsClient::new(base_url, session.clone());

    let suffix = unique_suffix();
    let creds = Credentials {
        email: format!("smoke_{suffix}@example.com"),
        password: "password123".to_string(),
    };

    client
        .register(&creds)
        .await
        .expect("register must succeed");

    let tokens = client.login(&creds).await.expect("login must succeed");
    assert!(!tokens.access.is_empty());
    session
        .save(&tokens.access)
        .expect("token save must succeed");

    let profile = client
        .create_profile("anonymous")
        .await
        .expect("create_profile must succeed");
    assert_eq!(profile.nick_name, "anonymous");

    let mine = client.my_profile().await.expect("my_profile must succeed");
    assert_eq!(mine.id, profile.id);

    let update = ProfileUpdate {
        id: mine.id,
        nick_name: format!("smoke_{suffix}"),
        image: None,
    };
    let updated = client
        .update_profile(&update)
        .await
        .expect("update_profile must succeed");
    assert_eq!(updated.nick_name, update.nick_name);

    let roster = client
        .all_profiles()
        .await
        .expect("all_profiles must succeed");
    assert!(roster.iter().any(|p| p.id == mine.id));

    let new_post = NewPost {
        title: format!("smoke title {suffix}"),
        image: None,
    };
    let created = client
        .create_post(&new_post)
        .await
        .expect("create_post must succeed");
    assert_eq!(created.title, new_post.title);

    let feed = client.posts().await.expect("posts must succeed");
    assert!(feed.iter().any(|post| post.id == created.id));

    // лайк: пустой список + свой id — частичное обновление
    let liked = client
        .patch_liked(
            created.id,
            &LikedPayload::Partial {
                liked: vec![mine.user_id],
            },
        )
        .await
        .expect("like must succeed");
    assert_eq!(liked.liked_by, vec![mine.user_id]);

    // снятие последнего лайка — полное обновление с заголовком
    let unliked = client
        .patch_liked(
            created.id,
            &LikedPayload::Replace {
                liked: vec![],
                title: created.title.clone(),
            },
        )
        .await
        .expect("unlike must succeed");
    assert!(unliked.liked_by.is_empty());

    let comment = client
        .create_comment(&NewComment {
            text: "smoke comment".to_string(),
            post_id: created.id,
        })
        .await
        .expect("create_comment must succeed");
    assert_eq!(comment.post_id, created.id);

    let comments = client.comments().await.expect("comments must succeed");
    assert!(comments.iter().any(|c| c.id == comment.id));
}
