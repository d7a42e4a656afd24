//! File-based posts with a `---` delimited key/value header.

use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::content::text::read_time;
use crate::error::Result;

const EXCERPT_CHARS: usize = 200;
const DEFAULT_AUTHOR: &str = "Elite Surgical Coders";
const DEFAULT_CATEGORY: &str = "General";

/// A document split into its header fields and body.
#[derive(Debug, Default, PartialEq)]
pub struct Document {
    pub fields: HashMap<String, String>,
    pub body: String,
}

/// A post loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePost {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: NaiveDate,
    pub read_time: String,
    pub category: String,
    pub image: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
}

/// Splits `text` into header fields and body.
///
/// Without a well-formed header the whole text is the body.
pub fn parse(text: &str) -> Document {
    let Some(rest) = strip_open_fence(text) else {
        return Document {
            fields: HashMap::new(),
            body: text.to_string(),
        };
    };

    let Some((header, body)) = split_close_fence(rest) else {
        return Document {
            fields: HashMap::new(),
            body: text.to_string(),
        };
    };

    let fields = header
        .lines()
        .filter_map(|line| {
            let colon = line.find(':')?;
            if colon == 0 {
                return None;
            }
            let key = line[..colon].trim().to_string();
            let value = strip_quotes(line[colon + 1..].trim()).to_string();
            Some((key, value))
        })
        .collect();

    Document {
        fields,
        body: body.to_string(),
    }
}

fn strip_open_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    let newline = rest.find('\n')?;
    rest[..newline].trim().is_empty().then(|| &rest[newline + 1..])
}

/// Finds the first `\n---` line that closes the header.
fn split_close_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    while let Some(found) = rest[offset..].find("\n---") {
        let fence = offset + found;
        let after = &rest[fence + 4..];
        if let Some(newline) = after.find('\n') {
            if after[..newline].trim().is_empty() {
                return Some((&rest[..fence], &after[newline + 1..]));
            }
        }
        offset = fence + 1;
    }
    None
}

fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .or_else(|| value.strip_prefix('\''))
        .unwrap_or(value);
    value
        .strip_suffix('"')
        .or_else(|| value.strip_suffix('\''))
        .unwrap_or(value)
}

/// Builds a post from a file name stem and its contents.
pub fn to_post(slug: &str, text: &str, today: NaiveDate) -> FilePost {
    let Document { fields, body } = parse(text);

    let excerpt = match fields.get("excerpt").filter(|e| !e.is_empty()) {
        Some(excerpt) => excerpt.clone(),
        None => {
            let first = body.split("\n\n").next().unwrap_or_default();
            let mut excerpt: String = first.chars().take(EXCERPT_CHARS).collect();
            excerpt = excerpt.trim().to_string();
            if first.chars().count() > EXCERPT_CHARS {
                excerpt.push_str("...");
            }
            excerpt
        }
    };

    let date = fields
        .get("date")
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(today);

    FilePost {
        slug: slug.to_string(),
        title: fields
            .get("title")
            .cloned()
            .unwrap_or_else(|| slug.replace('-', " ")),
        excerpt,
        read_time: read_time(&body),
        date,
        category: fields
            .get("category")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        image: fields.get("image").cloned(),
        author: fields
            .get("author")
            .cloned()
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        tags: fields
            .get("tags")
            .map(|t| t.split(',').map(|t| t.trim().to_string()).collect())
            .unwrap_or_default(),
        content: body,
    }
}

/// Loads every `.md`/`.txt` post in `dir`, newest first.
///
/// A missing directory yields no posts.
pub async fn load_directory(dir: &Path) -> Result<Vec<FilePost>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let today = Utc::now().date_naive();
    let mut posts = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name().to_string_lossy().to_string();
        let lower = file_name.to_ascii_lowercase();
        if lower.starts_with("readme") || lower.starts_with(".git") {
            continue;
        }

        let Some(slug) = file_name
            .strip_suffix(".md")
            .or_else(|| file_name.strip_suffix(".txt"))
        else {
            continue;
        };

        let text = tokio::fs::read_to_string(entry.path()).await?;
        posts.push(to_post(slug, &text, today));
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    tracing::debug!("Loaded {} posts from {}", posts.len(), dir.display());
    Ok(posts)
}
