use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{domain::post::Visibility, utils::version};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Tick rate, i.e. number of ticks per second",
        default_value_t = 4.0
    )]
    pub tick_rate: f64,

    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Frame rate, i.e. number of frames per second",
        default_value_t = 30.0
    )]
    pub frame_rate: f64,

    /// Receive pasted text key by key instead of as a single paste
    #[arg(long)]
    pub no_paste: bool,

    /// Without a subcommand the feed browser starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when not given
        #[arg(long, env = "INKFEED_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(long, env = "INKFEED_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Print pages of the feed
    List {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
        #[arg(long)]
        visibility: Option<Visibility>,
        /// Comma separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Print a single post
    Show { id: i64 },
    /// Publish a post
    Post {
        #[arg(long)]
        title: String,
        /// File with the post body, `-` for stdin
        #[arg(long, value_name = "PATH")]
        content_file: PathBuf,
        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value_t = Visibility::Public)]
        visibility: Visibility,
        /// Upload a local image as the main image
        #[arg(long, value_name = "PATH", conflicts_with = "generate_image")]
        image: Option<PathBuf>,
        /// Generate the main image from a prompt
        #[arg(long, value_name = "PROMPT")]
        generate_image: Option<String>,
    },
    /// Delete one of your posts
    Delete { id: i64 },
    /// Ask the assistant a question about the blog
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}
