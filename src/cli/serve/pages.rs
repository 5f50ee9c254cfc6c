//! Page handlers.
//!
//! Each handler renders the whole page into memory first and only then
//! responds, so a store or template failure mid-page can never emit a
//! torn document. Failures fall back to the error page, and if even
//! that template is broken, to a plain-text response.

use super::response;
use crate::config::{
    ARCHIVE_TEMPLATE, BlogConfig, CHALLENGE_TEMPLATE, POST_TEMPLATE, SUCCESS_TEMPLATE,
};
use crate::log;
use crate::store::Store;
use crate::template::HtmlTemplate;
use crate::utils::date::Date;
use anyhow::{Context, Result, bail};
use rand::seq::SliceRandom;
use std::fs;
use std::path::Path;
use tiny_http::Request;

const GENERIC_FAILURE: &str = "Something went wrong. Try again in a little while.";

// ==================== posts ====================

/// Serve a single post page. `None` means the newest post.
pub fn serve_post(request: Request, config: &BlogConfig, slug: Option<&str>) -> Result<()> {
    match render_post(config, slug) {
        Ok(Some(html)) => response::send_html(request, 200, html),
        Ok(None) => serve_error(
            request,
            config,
            404,
            "404 Not Found",
            "Sorry. That blog post doesn't exist.",
        ),
        Err(e) => internal_error(request, config, &e),
    }
}

fn render_post(config: &BlogConfig, slug: Option<&str>) -> Result<Option<String>> {
    let store = Store::open(&config.store_path())?;
    let post = match slug {
        Some(slug) => store.post_by_slug(slug)?,
        None => store.newest_post()?,
    };
    let Some(post) = post else {
        return Ok(None);
    };

    let mut temp = HtmlTemplate::open(&config.template_path(POST_TEMPLATE))?;
    temp.set_insert("<!--post-->");
    temp.h(&post.title)?;
    temp.h_level(&display_date(&post.post_date), 3)?;
    temp.append_raw(&post.text)?;
    temp.hr()?;

    // prev is the next-newer post, next the next-older one
    let (prev, next) = neighbor_slugs(&store, &post.url_title)?;
    temp.set_insert("<!--links-->");
    if let Some(prev) = prev {
        temp.div("prev-post")?;
        temp.a(&format!("/?p={prev}"), "Previous Post")?;
        temp.jump(0);
    }
    if let Some(next) = next {
        temp.div("next-post")?;
        temp.a(&format!("/?p={next}"), "Next Post")?;
        temp.jump(0);
    }

    Ok(Some(temp.render()?))
}

/// Neighbors of a post in the newest-first ordering.
fn neighbor_slugs(store: &Store, slug: &str) -> Result<(Option<String>, Option<String>)> {
    let slugs = store.ordered_slugs()?;
    let Some(pos) = slugs.iter().position(|s| s == slug) else {
        return Ok((None, None));
    };
    let prev = (pos > 0).then(|| slugs[pos - 1].clone());
    let next = slugs.get(pos + 1).cloned();
    Ok((prev, next))
}

/// Post dates are stored as ISO strings; a row that predates the
/// format is shown as stored rather than dropped.
fn display_date(iso: &str) -> String {
    match Date::parse(iso) {
        Some(date) => date.display(),
        None => iso.to_string(),
    }
}

// ==================== archive and search ====================

pub fn serve_archive(request: Request, config: &BlogConfig) -> Result<()> {
    match render_archive(config) {
        Ok(html) => response::send_html(request, 200, html),
        Err(e) => internal_error(request, config, &e),
    }
}

fn render_archive(config: &BlogConfig) -> Result<String> {
    let store = Store::open(&config.store_path())?;
    let posts = store.recent_summaries()?;

    let mut temp = HtmlTemplate::open(&config.template_path(ARCHIVE_TEMPLATE))?;
    temp.set_insert("<!--message-->");
    temp.p("Here's all my posts from newest to oldest:")?;
    temp.set_insert("<!--results-->");
    for post in &posts {
        temp.li()?;
        temp.a(&format!("/?p={}", post.url_title), &post.title)?;
        temp.p(&post.description)?;
        temp.jump(0);
    }
    Ok(temp.render()?)
}

pub fn serve_search(request: Request, config: &BlogConfig, term: &str) -> Result<()> {
    match render_search(config, term) {
        Ok(html) => response::send_html(request, 200, html),
        Err(e) => internal_error(request, config, &e),
    }
}

fn render_search(config: &BlogConfig, term: &str) -> Result<String> {
    let store = Store::open(&config.store_path())?;
    let hits = store.search(term)?;

    let mut temp = HtmlTemplate::open(&config.template_path(ARCHIVE_TEMPLATE))?;
    temp.set_insert("<!--message-->");
    if hits.is_empty() {
        temp.p("There weren't any relevant posts with your search terms.")?;
    } else {
        temp.p("Here are the results of your search:")?;
    }
    temp.set_insert("<!--results-->");
    for post in &hits {
        temp.li()?;
        temp.a(&format!("/?p={}", post.url_title), &post.title)?;
        temp.p(&post.description)?;
        temp.jump(0);
    }
    Ok(temp.render()?)
}

// ==================== contact challenge ====================

/// Serve the contact page behind a word challenge. A fresh word is
/// issued on every visit, including retries.
pub fn serve_challenge(request: Request, config: &BlogConfig, retry: bool) -> Result<()> {
    match render_challenge(config, retry) {
        Ok(html) => response::send_html(request, 200, html),
        Err(e) => internal_error(request, config, &e),
    }
}

fn render_challenge(config: &BlogConfig, retry: bool) -> Result<String> {
    let store = Store::open(&config.store_path())?;
    let word = random_word(&config.wordlist_path())?;
    store.insert_challenge(&word)?;

    let mut temp = HtmlTemplate::open(&config.template_path(CHALLENGE_TEMPLATE))?;
    temp.set_insert("<!--message-->");
    if retry {
        temp.p("That wasn't quite right. Here's a new word:")?;
    } else {
        temp.p("To get my email address, answer this little challenge:")?;
    }
    temp.set_insert("<!--word-->");
    temp.append_raw(&word)?;
    Ok(temp.render()?)
}

/// Check a submitted challenge answer. The answer must be a stored
/// word spelled backwards; a used word is deleted either way it is
/// found.
pub fn check_challenge(request: Request, config: &BlogConfig, answer: &str) -> Result<()> {
    match verify_challenge(config, answer) {
        Ok(Some(html)) => response::send_html(request, 200, html),
        Ok(None) => serve_challenge(request, config, true),
        Err(e) => internal_error(request, config, &e),
    }
}

fn verify_challenge(config: &BlogConfig, answer: &str) -> Result<Option<String>> {
    let store = Store::open(&config.store_path())?;
    let word: String = answer.trim().chars().rev().collect();
    let Some(challenge_id) = store.find_challenge(&word)? else {
        return Ok(None);
    };
    store.delete_challenge(challenge_id)?;

    let mut temp = HtmlTemplate::open(&config.template_path(SUCCESS_TEMPLATE))?;
    temp.set_insert("<!--message-->");
    temp.p("Thank you! My email is below. I hope to hear from you soon!")?;
    Ok(Some(temp.render()?))
}

/// Pick a random word from the wordlist file.
fn random_word(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read wordlist `{}`", path.display()))?;
    let words: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    match words.choose(&mut rand::thread_rng()) {
        Some(word) => Ok((*word).to_string()),
        None => bail!("wordlist `{}` is empty", path.display()),
    }
}

// ==================== error pages ====================

/// Serve an error page through the post template. If even that fails,
/// fall back to plain text so the client always gets an answer.
pub fn serve_error(
    request: Request,
    config: &BlogConfig,
    status: u16,
    status_line: &str,
    message: &str,
) -> Result<()> {
    match render_error(config, status_line, message) {
        Ok(html) => response::send_html(request, status, html),
        Err(e) => {
            log!("serve"; "error page failed: {e:#}");
            response::send_text(request, status, &format!("{status_line}\n{message}\n"))
        }
    }
}

fn internal_error(request: Request, config: &BlogConfig, error: &anyhow::Error) -> Result<()> {
    log!("serve"; "{error:#}");
    serve_error(request, config, 500, "500 Internal Error", GENERIC_FAILURE)
}

fn render_error(config: &BlogConfig, status_line: &str, message: &str) -> Result<String> {
    let mut temp = HtmlTemplate::open(&config.template_path(POST_TEMPLATE))?;
    temp.set_insert("<!--post-->");
    temp.h(status_line)?;
    temp.p(message)?;
    Ok(temp.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::init;
    use crate::store::NewPost;
    use tempfile::TempDir;

    fn test_blog() -> (TempDir, BlogConfig) {
        let temp = TempDir::new().unwrap();
        init::new_blog(Some(temp.path())).unwrap();
        let config = BlogConfig::load(&temp.path().join("blog.toml")).unwrap();
        (temp, config)
    }

    fn insert_posts(config: &BlogConfig, posts: &[(&str, &str)]) {
        let store = Store::open(&config.store_path()).unwrap();
        for (slug, date) in posts {
            store
                .insert_post(&NewPost {
                    title: "A Title",
                    url_title: slug,
                    post_date: date,
                    description: "words about things",
                    text: "<p>\n<p>hello</p>\n</p>\n",
                })
                .unwrap();
        }
    }

    #[test]
    fn test_render_post_by_slug() {
        let (_temp, config) = test_blog();
        insert_posts(&config, &[("first", "2024-06-15")]);

        let html = render_post(&config, Some("first")).unwrap().unwrap();
        assert!(html.contains("<h2>A Title</h2>"));
        assert!(html.contains("<h3>Jun. 15, 2024</h3>"));
        assert!(html.contains("<p>hello</p>"));
        // the only post has no neighbors
        assert!(!html.contains("Previous Post"));
        assert!(!html.contains("Next Post"));
    }

    #[test]
    fn test_render_post_default_is_newest() {
        let (_temp, config) = test_blog();
        insert_posts(&config, &[("old", "2024-01-01"), ("new", "2024-06-01")]);

        let html = render_post(&config, None).unwrap().unwrap();
        // newest post links back to the older one only
        assert!(html.contains("/?p=old"));
        assert!(html.contains("Next Post"));
        assert!(!html.contains("Previous Post"));
    }

    #[test]
    fn test_render_post_neighbors() {
        let (_temp, config) = test_blog();
        insert_posts(
            &config,
            &[
                ("oldest", "2024-01-01"),
                ("middle", "2024-03-01"),
                ("newest", "2024-06-01"),
            ],
        );

        let html = render_post(&config, Some("middle")).unwrap().unwrap();
        assert!(html.contains(r#"<a href="/?p=newest">Previous Post</a>"#));
        assert!(html.contains(r#"<a href="/?p=oldest">Next Post</a>"#));
        // nav links sit inside their container divs
        assert!(html.contains("<div id=\"prev-post\">"));
        assert!(html.contains("<div id=\"next-post\">"));
    }

    #[test]
    fn test_render_post_missing_slug() {
        let (_temp, config) = test_blog();
        insert_posts(&config, &[("first", "2024-06-15")]);
        assert!(render_post(&config, Some("absent")).unwrap().is_none());
    }

    #[test]
    fn test_render_archive_lists_posts() {
        let (_temp, config) = test_blog();
        insert_posts(&config, &[("old", "2024-01-01"), ("new", "2024-06-01")]);

        let html = render_archive(&config).unwrap();
        assert!(html.contains("newest to oldest"));
        let new_at = html.find("/?p=new").unwrap();
        let old_at = html.find("/?p=old").unwrap();
        assert!(new_at < old_at);
        assert!(html.contains("<p>words about things</p>"));
    }

    #[test]
    fn test_render_search_no_hits() {
        let (_temp, config) = test_blog();
        insert_posts(&config, &[("first", "2024-06-15")]);

        let html = render_search(&config, "zebra").unwrap();
        assert!(html.contains("There weren't any relevant posts"));
        assert!(!html.contains("/?p=first"));
    }

    #[test]
    fn test_render_search_with_hits() {
        let (_temp, config) = test_blog();
        insert_posts(&config, &[("first", "2024-06-15")]);

        let html = render_search(&config, "hello").unwrap();
        assert!(html.contains("results of your search"));
        assert!(html.contains("/?p=first"));
    }

    #[test]
    fn test_challenge_round_trip() {
        let (_temp, config) = test_blog();

        let html = render_challenge(&config, false).unwrap();
        // the issued word is on the page and in the store
        let store = Store::open(&config.store_path()).unwrap();
        let word = fs::read_to_string(config.wordlist_path())
            .unwrap()
            .lines()
            .map(str::to_string)
            .find(|w| store.find_challenge(w).unwrap().is_some())
            .unwrap();
        assert!(html.contains(&word));

        // reversed answer succeeds and consumes the challenge
        let answer: String = word.chars().rev().collect();
        let success = verify_challenge(&config, &answer).unwrap().unwrap();
        assert!(success.contains("My email is below"));
        assert!(store.find_challenge(&word).unwrap().is_none());

        // a second attempt with the same word fails
        assert!(verify_challenge(&config, &answer).unwrap().is_none());
    }

    #[test]
    fn test_challenge_wrong_answer() {
        let (_temp, config) = test_blog();
        render_challenge(&config, false).unwrap();
        assert!(verify_challenge(&config, "notaword").unwrap().is_none());
    }

    #[test]
    fn test_render_error_page() {
        let (_temp, config) = test_blog();
        let html = render_error(&config, "404 Not Found", "no such page").unwrap();
        assert!(html.contains("<h2>404 Not Found</h2>"));
        assert!(html.contains("<p>no such page</p>"));
    }

    #[test]
    fn test_random_word_trims_and_skips_blanks() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wordlist");
        fs::write(&path, "\n  lantern  \n\n").unwrap();
        assert_eq!(random_word(&path).unwrap(), "lantern");
    }

    #[test]
    fn test_random_word_empty_list() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wordlist");
        fs::write(&path, "\n\n").unwrap();
        assert!(random_word(&path).is_err());
    }
}
