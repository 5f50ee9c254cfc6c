//! inklet - a minimal database-backed blog engine.
//!
//! Posts are written in mml, a small line-oriented markup language,
//! converted to HTML at authoring time and stored in SQLite. The
//! server only ever reads finished HTML and pours it into marker-based
//! templates.

mod cli;
mod config;
mod logger;
mod markup;
mod store;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::BlogConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    let load = || BlogConfig::load(&cli.config);
    match &cli.command {
        Commands::Init { dir } => cli::init::new_blog(dir.as_deref()),
        Commands::Insert {
            title,
            slug,
            desc,
            file,
        } => cli::post::insert(&load()?, title, slug, desc, file),
        Commands::Update {
            slug,
            title,
            new_slug,
            date,
            desc,
            file,
        } => cli::post::update(
            &load()?,
            slug,
            &cli::post::UpdateFields {
                title: title.as_deref(),
                slug: new_slug.as_deref(),
                date: date.as_deref(),
                desc: desc.as_deref(),
                file: file.as_deref(),
            },
        ),
        Commands::Print { file } => cli::post::print(file),
        Commands::Serve { interface, port } => cli::serve::run(&load()?, *interface, *port),
    }
}
