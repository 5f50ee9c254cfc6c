//! clap argument definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueHint};
use std::net::IpAddr;
use std::path::PathBuf;

/// A minimal database-backed blog engine
#[derive(Parser, Debug)]
#[command(version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = "blog.toml",
        value_hint = ValueHint::FilePath
    )]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new blog: config, templates, wordlist and store
    Init {
        /// Blog directory (defaults to the current directory)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Convert an mml file and store it as a new post
    Insert {
        /// Post title
        #[arg(short, long)]
        title: String,

        /// URL slug (lowercase letters, digits and hyphens)
        #[arg(short, long)]
        slug: String,

        /// Short description shown in listings
        #[arg(short, long)]
        desc: String,

        /// mml source file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Update fields of an existing post, addressed by slug
    Update {
        /// Slug of the post to update
        slug: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New slug
        #[arg(long = "slug", value_name = "SLUG")]
        new_slug: Option<String>,

        /// New post date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New description
        #[arg(long)]
        desc: Option<String>,

        /// mml source file replacing the post body
        #[arg(long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Convert an mml file and print the HTML to stdout
    Print {
        /// mml source file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Serve the blog over HTTP
    Serve {
        /// Network interface to bind (overrides config)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
