//! Blog scaffolding.
//!
//! Creates a ready-to-serve blog: default config, the four page
//! templates with their insertion markers, a starter wordlist and an
//! empty store with the schema applied.

use crate::config::{
    ARCHIVE_TEMPLATE, CHALLENGE_TEMPLATE, POST_TEMPLATE, SUCCESS_TEMPLATE,
};
use crate::log;
use crate::store::Store;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"[store]
path = "blog.db"

[templates]
dir = "templates"
wordlist = "wordlist"

[serve]
interface = "127.0.0.1"
port = 8015
"#;

const POST_TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>blog</title>
</head>
<body>
<nav><a href="/">Latest</a> <a href="/?p=archive">Archive</a> <a href="/?p=contact">Contact</a></nav>
<main>
<!--post-->
</main>
<footer>
<!--links-->
</footer>
</body>
</html>
"#;

const ARCHIVE_TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>blog - archive</title>
</head>
<body>
<nav><a href="/">Latest</a> <a href="/?p=contact">Contact</a></nav>
<main>
<!--message-->
<form method="post" action="/">
<input type="text" name="search" placeholder="search posts">
<input type="submit" value="Search">
</form>
<ul>
<!--results-->
</ul>
</main>
</body>
</html>
"#;

const CHALLENGE_TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>blog - contact</title>
</head>
<body>
<nav><a href="/">Latest</a> <a href="/?p=archive">Archive</a></nav>
<main>
<!--message-->
<p>Type this word backwards:</p>
<!--word-->
<form method="post" action="/">
<input type="text" name="challenge">
<input type="submit" value="Answer">
</form>
</main>
</body>
</html>
"#;

const SUCCESS_TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>blog - contact</title>
</head>
<body>
<nav><a href="/">Latest</a> <a href="/?p=archive">Archive</a></nav>
<main>
<!--message-->
<p>you@example.com</p>
</main>
</body>
</html>
"#;

const DEFAULT_WORDLIST: &str = "lantern
marmot
thimble
juniper
cobble
drift
ember
quill
saffron
willow
";

/// Scaffold files written under the blog root, besides the store.
const SCAFFOLD: &[(&str, &str)] = &[
    ("blog.toml", DEFAULT_CONFIG),
    ("wordlist", DEFAULT_WORDLIST),
];

const TEMPLATES: &[(&str, &str)] = &[
    (POST_TEMPLATE, POST_TEMPLATE_HTML),
    (ARCHIVE_TEMPLATE, ARCHIVE_TEMPLATE_HTML),
    (CHALLENGE_TEMPLATE, CHALLENGE_TEMPLATE_HTML),
    (SUCCESS_TEMPLATE, SUCCESS_TEMPLATE_HTML),
];

/// Create a new blog at `dir` (or the current directory).
///
/// Refuses to touch a directory that already holds a `blog.toml`.
pub fn new_blog(dir: Option<&Path>) -> Result<()> {
    let root = dir.unwrap_or(Path::new("."));

    if root.join("blog.toml").exists() {
        bail!("`{}` already contains a blog.toml", root.display());
    }

    let templates = root.join("templates");
    fs::create_dir_all(&templates)
        .with_context(|| format!("failed to create `{}`", templates.display()))?;

    for (name, content) in SCAFFOLD {
        let path = root.join(name);
        fs::write(&path, content)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
    }
    for (name, content) in TEMPLATES {
        let path = templates.join(name);
        fs::write(&path, content)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
    }

    let store = Store::open(&root.join("blog.db"))?;
    store.init_schema()?;

    log!("init"; "blog initialized at `{}`", root.display());
    Ok(())
}
