//! SQLite-backed storage for posts and contact challenges.
//!
//! Every operation opens with a fresh prepared statement; the
//! connection itself is cheap to open, so the server creates one per
//! request and the authoring CLI one per invocation.

use sqlite::{BindableWithIndex, Connection, State};
use std::path::Path;
use thiserror::Error;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS blog_posts (
    post_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url_title TEXT NOT NULL UNIQUE,
    post_date TEXT NOT NULL,
    description TEXT NOT NULL,
    text TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS email_challenges (
    challenge_id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL,
    creation_time TEXT NOT NULL
);
";

// Same ordering everywhere so listings and neighbor navigation agree.
const POST_ORDER: &str = "ORDER BY post_date DESC, post_id DESC";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sql error: {0}")]
    Sqlite(#[from] sqlite::Error),
}

/// A full post, as served on a post page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub url_title: String,
    pub post_date: String,
    /// Finished HTML, converted from mml at authoring time.
    pub text: String,
}

/// The listing view of a post, as shown in archive and search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub url_title: String,
    pub title: String,
    pub description: String,
}

/// Fields for a post insertion. All text is expected to be sanitized
/// or converted already.
#[derive(Debug, Clone, Copy)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub url_title: &'a str,
    pub post_date: &'a str,
    pub description: &'a str,
    pub text: &'a str,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: sqlite::open(path)?,
        })
    }

    /// Create both tables if they don't exist yet.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(SCHEMA)?;
        Ok(())
    }

    // ==================== posts: reads ====================

    pub fn post_count(&self) -> Result<i64, StoreError> {
        let mut st = self.conn.prepare("SELECT COUNT(*) AS n FROM blog_posts")?;
        match st.next()? {
            State::Row => Ok(st.read("n")?),
            State::Done => Ok(0),
        }
    }

    /// The most recent post, served at the blog root.
    pub fn newest_post(&self) -> Result<Option<Post>, StoreError> {
        let mut st = self.conn.prepare(&format!(
            "SELECT title, url_title, post_date, text FROM blog_posts {POST_ORDER} LIMIT 1"
        ))?;
        read_post(&mut st)
    }

    pub fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let mut st = self.conn.prepare(
            "SELECT title, url_title, post_date, text FROM blog_posts WHERE url_title = ?",
        )?;
        slug.bind(&mut st, 1)?;
        read_post(&mut st)
    }

    pub fn post_id_by_slug(&self, slug: &str) -> Result<Option<i64>, StoreError> {
        let mut st = self
            .conn
            .prepare("SELECT post_id FROM blog_posts WHERE url_title = ?")?;
        slug.bind(&mut st, 1)?;
        match st.next()? {
            State::Row => Ok(Some(st.read("post_id")?)),
            State::Done => Ok(None),
        }
    }

    /// Every slug, newest first. Neighbor navigation walks this list.
    pub fn ordered_slugs(&self) -> Result<Vec<String>, StoreError> {
        let mut st = self
            .conn
            .prepare(&format!("SELECT url_title FROM blog_posts {POST_ORDER}"))?;
        let mut slugs = Vec::new();
        while let State::Row = st.next()? {
            slugs.push(st.read("url_title")?);
        }
        Ok(slugs)
    }

    /// The archive listing, newest first, capped at 20 entries.
    pub fn recent_summaries(&self) -> Result<Vec<PostSummary>, StoreError> {
        let mut st = self.conn.prepare(&format!(
            "SELECT url_title, title, description FROM blog_posts {POST_ORDER} LIMIT 20"
        ))?;
        read_summaries(&mut st)
    }

    /// Case-insensitive substring search over title, description and
    /// body, newest first, capped at 20 entries.
    pub fn search(&self, term: &str) -> Result<Vec<PostSummary>, StoreError> {
        let pattern = format!("%{term}%");
        let mut st = self.conn.prepare(&format!(
            "SELECT url_title, title, description FROM blog_posts \
             WHERE title LIKE ? OR description LIKE ? OR text LIKE ? {POST_ORDER} LIMIT 20"
        ))?;
        st.bind(&[pattern.as_str(), pattern.as_str(), pattern.as_str()][..])?;
        read_summaries(&mut st)
    }

    // ==================== posts: writes ====================

    pub fn insert_post(&self, post: &NewPost) -> Result<(), StoreError> {
        let mut st = self.conn.prepare(
            "INSERT INTO blog_posts (title, url_title, post_date, description, text) \
             VALUES (?, ?, ?, ?, ?)",
        )?;
        st.bind(
            &[
                post.title,
                post.url_title,
                post.post_date,
                post.description,
                post.text,
            ][..],
        )?;
        st.next()?;
        Ok(())
    }

    pub fn update_title(&self, post_id: i64, title: &str) -> Result<(), StoreError> {
        self.update_field("UPDATE blog_posts SET title = ? WHERE post_id = ?", title, post_id)
    }

    pub fn update_slug(&self, post_id: i64, slug: &str) -> Result<(), StoreError> {
        self.update_field(
            "UPDATE blog_posts SET url_title = ? WHERE post_id = ?",
            slug,
            post_id,
        )
    }

    pub fn update_date(&self, post_id: i64, date: &str) -> Result<(), StoreError> {
        self.update_field(
            "UPDATE blog_posts SET post_date = ? WHERE post_id = ?",
            date,
            post_id,
        )
    }

    pub fn update_description(&self, post_id: i64, description: &str) -> Result<(), StoreError> {
        self.update_field(
            "UPDATE blog_posts SET description = ? WHERE post_id = ?",
            description,
            post_id,
        )
    }

    pub fn update_text(&self, post_id: i64, text: &str) -> Result<(), StoreError> {
        self.update_field("UPDATE blog_posts SET text = ? WHERE post_id = ?", text, post_id)
    }

    fn update_field(&self, sql: &str, value: &str, post_id: i64) -> Result<(), StoreError> {
        let mut st = self.conn.prepare(sql)?;
        value.bind(&mut st, 1)?;
        post_id.bind(&mut st, 2)?;
        st.next()?;
        Ok(())
    }

    // ==================== challenges ====================

    pub fn insert_challenge(&self, word: &str) -> Result<(), StoreError> {
        let mut st = self.conn.prepare(
            "INSERT INTO email_challenges (word, creation_time) VALUES (?, datetime('now'))",
        )?;
        word.bind(&mut st, 1)?;
        st.next()?;
        Ok(())
    }

    /// Look up a challenge by its word. If the same word was issued
    /// more than once any one row counts.
    pub fn find_challenge(&self, word: &str) -> Result<Option<i64>, StoreError> {
        let mut st = self
            .conn
            .prepare("SELECT challenge_id FROM email_challenges WHERE word = ? LIMIT 1")?;
        word.bind(&mut st, 1)?;
        match st.next()? {
            State::Row => Ok(Some(st.read("challenge_id")?)),
            State::Done => Ok(None),
        }
    }

    pub fn delete_challenge(&self, challenge_id: i64) -> Result<(), StoreError> {
        let mut st = self
            .conn
            .prepare("DELETE FROM email_challenges WHERE challenge_id = ?")?;
        challenge_id.bind(&mut st, 1)?;
        st.next()?;
        Ok(())
    }
}

fn read_post(st: &mut sqlite::Statement<'_>) -> Result<Option<Post>, StoreError> {
    match st.next()? {
        State::Row => Ok(Some(Post {
            title: st.read("title")?,
            url_title: st.read("url_title")?,
            post_date: st.read("post_date")?,
            text: st.read("text")?,
        })),
        State::Done => Ok(None),
    }
}

fn read_summaries(st: &mut sqlite::Statement<'_>) -> Result<Vec<PostSummary>, StoreError> {
    let mut rows = Vec::new();
    while let State::Row = st.next()? {
        rows.push(PostSummary {
            url_title: st.read("url_title")?,
            title: st.read("title")?,
            description: st.read("description")?,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, Store) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(&temp.path().join("blog.db")).unwrap();
        store.init_schema().unwrap();
        (temp, store)
    }

    fn sample(slug: &'static str, date: &'static str) -> NewPost<'static> {
        NewPost {
            title: "A Title",
            url_title: slug,
            post_date: date,
            description: "about things",
            text: "<p>\n<p>hello</p>\n</p>\n",
        }
    }

    #[test]
    fn test_insert_then_fetch() {
        let (_temp, store) = test_store();
        store.insert_post(&sample("first", "2024-06-01")).unwrap();

        assert_eq!(store.post_count().unwrap(), 1);
        let post = store.post_by_slug("first").unwrap().unwrap();
        assert_eq!(post.title, "A Title");
        assert_eq!(post.text, "<p>\n<p>hello</p>\n</p>\n");
        assert!(store.post_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_newest_post_and_ordering() {
        let (_temp, store) = test_store();
        store.insert_post(&sample("old", "2024-01-01")).unwrap();
        store.insert_post(&sample("new", "2024-06-01")).unwrap();

        let newest = store.newest_post().unwrap().unwrap();
        assert_eq!(newest.url_title, "new");
        assert_eq!(store.ordered_slugs().unwrap(), vec!["new", "old"]);
    }

    #[test]
    fn test_newest_post_empty_store() {
        let (_temp, store) = test_store();
        assert!(store.newest_post().unwrap().is_none());
        assert_eq!(store.post_count().unwrap(), 0);
    }

    #[test]
    fn test_search_matches_body_case_insensitive() {
        let (_temp, store) = test_store();
        store.insert_post(&sample("first", "2024-06-01")).unwrap();

        let hits = store.search("HELLO").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url_title, "first");
        assert!(store.search("absent").unwrap().is_empty());
    }

    #[test]
    fn test_update_fields() {
        let (_temp, store) = test_store();
        store.insert_post(&sample("first", "2024-06-01")).unwrap();
        let id = store.post_id_by_slug("first").unwrap().unwrap();

        store.update_title(id, "New Title").unwrap();
        store.update_date(id, "2024-07-01").unwrap();
        store.update_slug(id, "renamed").unwrap();

        assert!(store.post_id_by_slug("first").unwrap().is_none());
        let post = store.post_by_slug("renamed").unwrap().unwrap();
        assert_eq!(post.title, "New Title");
        assert_eq!(post.post_date, "2024-07-01");
    }

    #[test]
    fn test_challenge_lifecycle() {
        let (_temp, store) = test_store();
        store.insert_challenge("marmot").unwrap();

        let id = store.find_challenge("marmot").unwrap().unwrap();
        store.delete_challenge(id).unwrap();
        assert!(store.find_challenge("marmot").unwrap().is_none());
    }
}
