//! Authoring operations: insert, update and print.
//!
//! Conversion happens here, once, at authoring time. The store only
//! ever holds finished HTML, so serving never touches the converter.

use crate::config::BlogConfig;
use crate::log;
use crate::markup;
use crate::store::{NewPost, Store};
use crate::utils::date::Date;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Optional field updates for an existing post.
#[derive(Debug, Default)]
pub struct UpdateFields<'a> {
    pub title: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub date: Option<&'a str>,
    pub desc: Option<&'a str>,
    pub file: Option<&'a Path>,
}

/// Convert an mml file and insert it as a new post, dated today.
pub fn insert(config: &BlogConfig, title: &str, slug: &str, desc: &str, file: &Path) -> Result<()> {
    let html = convert_file(file)?;
    let store = Store::open(&config.store_path())?;

    store.insert_post(&NewPost {
        title: &markup::sanitize(title),
        url_title: &markup::sanitize(slug),
        post_date: &Date::today().to_iso(),
        description: &markup::sanitize(desc),
        text: &html,
    })?;

    log!("post"; "inserted `{slug}`");
    Ok(())
}

/// Update any subset of a post's fields.
pub fn update(config: &BlogConfig, slug: &str, fields: &UpdateFields) -> Result<()> {
    let store = Store::open(&config.store_path())?;
    let Some(post_id) = store.post_id_by_slug(slug)? else {
        bail!("no post with slug `{slug}`");
    };

    if let Some(title) = fields.title {
        store.update_title(post_id, &markup::sanitize(title))?;
    }
    if let Some(new_slug) = fields.slug {
        store.update_slug(post_id, &markup::sanitize(new_slug))?;
    }
    if let Some(date) = fields.date {
        let parsed = Date::parse(date)
            .with_context(|| format!("invalid date `{date}`, expected YYYY-MM-DD"))?;
        store.update_date(post_id, &parsed.to_iso())?;
    }
    if let Some(desc) = fields.desc {
        store.update_description(post_id, &markup::sanitize(desc))?;
    }
    if let Some(file) = fields.file {
        store.update_text(post_id, &convert_file(file)?)?;
    }

    log!("post"; "updated `{slug}`");
    Ok(())
}

/// Convert an mml file and print the HTML to stdout.
pub fn print(file: &Path) -> Result<()> {
    print!("{}", convert_file(file)?);
    Ok(())
}

fn convert_file(file: &Path) -> Result<String> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;
    markup::convert_document(&source).with_context(|| format!("in `{}`", file.display()))
}
