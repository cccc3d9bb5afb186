use std::{io::IsTerminal, path::Path};

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use inkfeed::{
    domain::{
        post::{FeedFilter, Post, PostId},
        session::{Credentials, Registration},
        text::parse_tags,
    },
    infrastructure::{
        cli::{Cli, Command},
        config::Config,
        tui::real::RealTui,
    },
    integration::{app_runner::AppRunner, headless, runtime::Runtime},
    model::composer::{Draft, ImageSource},
    presentation::widgets::post_card::PostCard,
    utils::{initialize_logging, initialize_panic_handler},
};

async fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    if std::io::stdin().is_terminal() {
        eprint!("Password: ");
    }
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .wrap_err("Cannot read the password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password is required");
    }
    Ok(password)
}

async fn read_content(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .wrap_err("Cannot read the post body from stdin")?;
        return Ok(content);
    }
    tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Cannot read {}", path.display()))
}

fn print_post(post: &Post, blog_url: &str) {
    println!("#{} {}", post.id, post.title);
    println!("{}", PostCard::new(post).meta());
    if let Some(url) = post.image_url(blog_url) {
        println!("Image: {url}");
    }
    println!();
    println!("{}", post.content);
}

async fn run_command(runtime: &mut Runtime, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let password = read_password(password).await?;
            let message = headless::login(runtime, Credentials::new(username, password)).await?;
            println!("{message}");
        }
        Command::Signup {
            username,
            email,
            password,
        } => {
            let password = read_password(password).await?;
            let registration = Registration {
                credentials: Credentials::new(username, password),
                email,
            };
            println!("{}", headless::signup(runtime, registration).await?);
        }
        Command::Logout => println!("{}", headless::logout(runtime).await?),
        Command::List {
            pages,
            visibility,
            tags,
        } => {
            let filter = (visibility.is_some() || tags.is_some()).then(|| FeedFilter {
                visibility: visibility.or(config.feed.visibility),
                tags: tags.as_deref().map(parse_tags).unwrap_or_default(),
            });
            let posts = headless::list(runtime, pages, filter).await?;
            for post in &posts {
                println!("{:>6}  {:<10} {}", post.id, post.visibility, post.title);
            }
            if !runtime.state().feed.has_more() {
                eprintln!("({} posts, end of feed)", posts.len());
            }
        }
        Command::Show { id } => {
            let post = headless::show(runtime, PostId(id)).await?;
            print_post(&post, &config.api.blog_url);
        }
        Command::Post {
            title,
            content_file,
            tags,
            visibility,
            image,
            generate_image,
        } => {
            let image = match (image, generate_image) {
                (Some(path), _) => ImageSource::Upload(path),
                (None, Some(prompt)) => ImageSource::Generate(prompt),
                (None, None) => ImageSource::None,
            };
            let draft = Draft {
                title,
                content: read_content(&content_file).await?,
                tags,
                visibility,
                image,
            };
            let id = headless::publish(runtime, draft).await?;
            println!("Created post #{id}");
        }
        Command::Delete { id } => println!("{}", headless::delete(runtime, PostId(id)).await?),
        Command::Ask { question } => {
            let answer = headless::ask(runtime, &question.join(" ")).await?;
            println!("{}", answer.content);
        }
    }
    Ok(())
}

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = Cli::parse();
    let config = Config::new()?;

    let mut runtime = Runtime::from_config(&config)?;
    if let Err(e) = runtime.restore_session().await {
        log::warn!("Ignoring the saved session: {e}");
    }

    match args.command {
        Some(command) => run_command(&mut runtime, &config, command).await,
        None => {
            let tui = RealTui::new()?
                .tick_rate(args.tick_rate)
                .frame_rate(args.frame_rate)
                .paste(!args.no_paste);
            AppRunner::new(runtime, tui).run().await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
