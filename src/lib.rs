//! Backend for the Elite Surgical Coders marketing site: admin sessions,
//! blog and career content, job applications, contact leads and uploads.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod content {
    pub mod frontmatter;
    pub mod markdown;
    pub mod text;
}

pub mod crypto {
    pub mod csrf;
    pub mod password;
    pub mod session;
}

pub mod models {
    pub mod application;
    pub mod blog;
    pub mod career;
    pub mod lead;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod application;
    pub mod blog;
    pub mod career;
    pub mod lead;
    pub mod user;
}

pub mod services {
    pub mod application;
    pub mod auth;
    pub mod blog;
    pub mod career;
    pub mod contact;
    pub mod mailer;
    pub mod notifications;
    pub mod uploads;
}

pub mod handlers {
    pub mod application;
    pub mod auth;
    pub mod blog;
    pub mod career;
    pub mod contact;
    pub mod health;
    pub mod public;
    pub mod response;
    pub mod uploads;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod csrf;
    pub mod rate_limit;
}

pub mod validation {
    pub mod auth;
    pub mod content;
}
