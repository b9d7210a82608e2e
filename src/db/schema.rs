//! Database schema and migrations.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded. All timestamps are Unix milliseconds.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Identities
    r#"
CREATE TABLE identities (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    handle          TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash   TEXT NOT NULL,           -- PHC string
    created_at      INTEGER NOT NULL
);
"#,
    // v2: Sessions keyed by token digest, indexed on expiry for sweeping
    r#"
CREATE TABLE sessions (
    token_hash      TEXT PRIMARY KEY,        -- SHA-256 hex of the token
    identity_id     INTEGER NOT NULL REFERENCES identities(id) ON DELETE CASCADE,
    created_at      INTEGER NOT NULL,
    expires_at      INTEGER NOT NULL,
    CHECK (expires_at > created_at)
);

CREATE INDEX idx_sessions_expires_at ON sessions(expires_at);
CREATE INDEX idx_sessions_identity_id ON sessions(identity_id);
"#,
    // v3: Posts and their category tags
    r#"
CREATE TABLE posts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    body            TEXT NOT NULL,
    author_id       INTEGER NOT NULL REFERENCES identities(id),
    attachment_ref  TEXT,
    attachment_size INTEGER,
    created_at      INTEGER NOT NULL,
    CHECK ((attachment_ref IS NULL) = (attachment_size IS NULL))
);

CREATE INDEX idx_posts_created_at ON posts(created_at);
CREATE INDEX idx_posts_author_id ON posts(author_id);

CREATE TABLE post_categories (
    post_id         INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    tag             TEXT NOT NULL,
    PRIMARY KEY (post_id, tag)
);

CREATE INDEX idx_post_categories_tag ON post_categories(tag);
"#,
];
