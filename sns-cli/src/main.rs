use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sns_client::{
    Comment, Credentials, ImageFile, LikedChange, NewComment, NewPost, Post, ProfileUpdate,
    SnsClient, SnsClientError, UserProfile,
};
use sns_store::{BootstrapError, SnsStore};

mod logging;
mod settings;

use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "sns-cli", version, about = "CLI клиент для SNS-бэкенда")]
struct Cli {
    /// Адрес сервера; переопределяет SNS_API_BASE_URL.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация: создаёт учётную запись, профиль и загружает кэши.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Никнейм создаваемого профиля.
        #[arg(long, default_value = "anonymous")]
        nickname: String,
    },
    /// Вход: сохраняет токен и загружает профили.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённый токен.
    Logout,
    /// Стартовая синхронизация: профиль, лента, реестр, комментарии.
    Boot,
    /// Мой профиль.
    Profile,
    /// Обновление моего профиля (требует токен).
    UpdateProfile {
        #[arg(long)]
        nickname: String,
        /// Путь к файлу аватара.
        #[arg(long)]
        img: Option<PathBuf>,
    },
    /// Профили всех пользователей.
    Profiles,
    /// Лента постов, новые сверху.
    Posts,
    /// Создание поста (требует токен).
    NewPost {
        #[arg(long)]
        title: String,
        /// Путь к файлу изображения.
        #[arg(long)]
        img: Option<PathBuf>,
    },
    /// Переключение лайка на посте.
    Like {
        #[arg(long)]
        post_id: i64,
    },
    /// Комментарии; с `--post-id` — только к одному посту.
    Comments {
        #[arg(long)]
        post_id: Option<i64>,
    },
    /// Новый комментарий к посту.
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    logging::init_logging(&settings.log_level)?;

    let cli = Cli::parse();

    let base_url = normalize_server(
        cli.server
            .unwrap_or_else(|| settings.api_base_url.clone()),
    );
    tracing::debug!(%base_url, token_file = %settings.token_file, "sns-cli started");

    let session = Arc::new(sns_client::FileTokenStore::new(&settings.token_file));
    let client = Arc::new(SnsClient::new(base_url, session.clone()));
    let mut store = SnsStore::new(client, session);

    match cli.command {
        Command::Signup {
            email,
            password,
            nickname,
        } => {
            let creds = Credentials { email, password };
            store
                .sign_up(&creds, &nickname)
                .await
                .map_err(map_bootstrap_error)?;
            println!("Регистрация успешна");
            print_profile("Мой профиль", store.auth.my_profile());
            println!("профилей в реестре: {}", store.auth.profiles().len());
        }
        Command::Login { email, password } => {
            let creds = Credentials { email, password };
            store.sign_in(&creds).await.map_err(map_bootstrap_error)?;
            println!("Вход выполнен");
            print_profile("Мой профиль", store.auth.my_profile());
        }
        Command::Logout => {
            store.auth.logout().map_err(map_client_error)?;
            println!("Выход выполнен, токен удалён");
        }
        Command::Boot => {
            store.startup().await.map_err(map_bootstrap_error)?;
            print_profile("Мой профиль", store.auth.my_profile());
            println!("профилей: {}", store.auth.profiles().len());
            print_feed(store.post.posts(), store.post.comments());
        }
        Command::Profile => {
            store
                .auth
                .fetch_my_profile()
                .await
                .map_err(map_client_error)?;
            print_profile("Мой профиль", store.auth.my_profile());
        }
        Command::UpdateProfile { nickname, img } => {
            store
                .auth
                .fetch_my_profile()
                .await
                .map_err(map_client_error)?;
            let update = ProfileUpdate {
                id: store.auth.my_profile().id,
                nick_name: nickname,
                image: load_image(img.as_deref())?,
            };
            store
                .auth
                .update_profile(&update)
                .await
                .map_err(map_client_error)?;
            print_profile("Профиль обновлён", store.auth.my_profile());
        }
        Command::Profiles => {
            store.auth.begin_loading();
            let result = store.auth.fetch_all_profiles().await;
            store.auth.end_loading();
            result.map_err(map_client_error)?;

            println!("Профилей: {}", store.auth.profiles().len());
            for profile in store.auth.profiles() {
                println!(
                    "- [{}] {} (user_id={})",
                    profile.id, profile.nick_name, profile.user_id
                );
            }
        }
        Command::Posts => {
            store.post.begin_loading();
            let result = store.post.fetch_posts().await;
            store.post.end_loading();
            result.map_err(map_client_error)?;

            print_feed(store.post.posts(), store.post.comments());
        }
        Command::NewPost { title, img } => {
            let new_post = NewPost {
                title,
                image: load_image(img.as_deref())?,
            };
            let created = store
                .post
                .create_post(&new_post)
                .await
                .map_err(map_client_error)?;
            // лента обновляется только повторной загрузкой
            store
                .post
                .fetch_posts()
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &created);
        }
        Command::Like { post_id } => {
            store
                .auth
                .fetch_my_profile()
                .await
                .map_err(map_client_error)?;
            store.post.fetch_posts().await.map_err(map_client_error)?;

            let target = store
                .post
                .posts()
                .iter()
                .find(|post| post.id == post_id)
                .cloned()
                .context("пост с таким id не найден")?;

            let change = LikedChange {
                post_id,
                title: target.title.clone(),
                current: target.liked_by.clone(),
                acting_user_id: store.auth.my_profile().user_id,
            };
            let updated = store
                .post
                .patch_liked(&change)
                .await
                .map_err(map_client_error)?;
            print_post("Лайк обновлён", &updated);
        }
        Command::Comments { post_id } => {
            store
                .post
                .fetch_comments()
                .await
                .map_err(map_client_error)?;

            let comments: Vec<&Comment> = store
                .post
                .comments()
                .iter()
                .filter(|comment| post_id.is_none_or(|id| comment.post_id == id))
                .collect();

            println!("Комментариев: {}", comments.len());
            for comment in comments {
                print_comment(comment);
            }
        }
        Command::Comment { post_id, text } => {
            let created = store
                .post
                .create_comment(&NewComment { text, post_id })
                .await
                .map_err(map_client_error)?;
            println!("Комментарий создан: id={}", created.id);
        }
    }

    Ok(())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn image_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn load_image(path: Option<&Path>) -> Result<Option<ImageFile>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let bytes = std::fs::read(path)
        .with_context(|| format!("не удалось прочитать файл изображения {}", path.display()))?;

    Ok(Some(ImageFile {
        file_name: image_file_name(path),
        bytes,
    }))
}

fn map_client_error(err: SnsClientError) -> anyhow::Error {
    let message = match err {
        SnsClientError::Unauthorized => {
            "требуется авторизация: выполните `sns-cli login ...` или `sns-cli signup ...`"
                .to_string()
        }
        SnsClientError::NotFound => "ресурс не найден".to_string(),
        SnsClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        SnsClientError::Http(err) => format!("ошибка HTTP: {err}"),
        SnsClientError::Session(err) => format!("ошибка хранилища токена: {err}"),
    };
    anyhow::anyhow!(message)
}

fn map_bootstrap_error(err: BootstrapError) -> anyhow::Error {
    let BootstrapError { step, source } = err;
    map_client_error(source).context(format!("шаг `{step}` не выполнен"))
}

fn print_profile(title: &str, profile: &UserProfile) {
    println!("{title}");
    println!("  id: {}", profile.id);
    println!("  nickname: {}", profile.nick_name);
    println!("  user_id: {}", profile.user_id);
    println!("  created_on: {}", profile.created_on);
    if let Some(image_url) = &profile.image_url {
        println!("  img: {image_url}");
    }
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("  id: {}", post.id);
    println!("  title: {}", post.title);
    println!("  author_id: {}", post.author_id);
    println!("  created_on: {}", post.created_on);
    println!("  лайков: {}", post.liked_by.len());
}

fn print_comment(comment: &Comment) {
    println!(
        "- [{}] пост {} (author_id={}): {}",
        comment.id, comment.post_id, comment.author_id, comment.text
    );
}

fn print_feed(posts: &[Post], comments: &[Comment]) {
    println!("Постов: {}", posts.len());
    // лента хранится в порядке создания, показываем новые сверху
    for post in posts.iter().rev() {
        let comment_count = comments
            .iter()
            .filter(|comment| comment.post_id == post.id)
            .count();
        println!(
            "- [{}] {} (author_id={}, лайков={}, комментариев={})",
            post.id,
            post.title,
            post.author_id,
            post.liked_by.len(),
            comment_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8000".to_string());
        assert_eq!(s, "https://example.com:8000");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8000".to_string());
        assert_eq!(s, "http://127.0.0.1:8000");
    }

    #[test]
    fn image_file_name_uses_base_name() {
        let name = image_file_name(Path::new("/tmp/photos/avatar.png"));
        assert_eq!(name, "avatar.png");
    }

    #[test]
    fn image_file_name_falls_back_for_odd_paths() {
        let name = image_file_name(Path::new("/"));
        assert_eq!(name, "image");
    }
}
