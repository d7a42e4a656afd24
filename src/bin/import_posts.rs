//! Imports markdown posts with frontmatter into `blog_posts`.
//!
//! Usage: `import_posts <dir>`. Posts whose slug already exists are skipped.

use std::path::PathBuf;

use chrono::{NaiveTime, TimeZone, Utc};
use medcode_site::{
    config::Config,
    content::frontmatter::{FilePost, load_directory},
    db,
    models::blog::NewBlogPost,
    repositories::blog as blog_repo,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn to_new_post(post: FilePost) -> NewBlogPost {
    NewBlogPost {
        slug: post.slug,
        title: post.title,
        excerpt: Some(post.excerpt),
        content: post.content,
        image: post.image,
        category: post.category,
        author: post.author,
        tags: post.tags,
        published: true,
        date: Some(Utc.from_utc_datetime(&post.date.and_time(NaiveTime::MIN))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("usage: import_posts <dir>"))?;

    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url)?;
    db::migrate(&pool).await?;

    let posts = load_directory(&dir).await?;
    tracing::info!("📚 Found {} posts in {}", posts.len(), dir.display());

    let (mut imported, mut skipped) = (0usize, 0usize);
    for post in posts {
        if blog_repo::slug_taken(&pool, &post.slug, None).await? {
            tracing::info!("⏭️ Skipping existing slug: {}", post.slug);
            skipped += 1;
            continue;
        }
        let created = blog_repo::create(&pool, &to_new_post(post), None).await?;
        tracing::info!("✅ Imported: {}", created.slug);
        imported += 1;
    }

    tracing::info!("🎉 Import finished: {} imported, {} skipped", imported, skipped);
    Ok(())
}
