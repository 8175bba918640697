// CLI module - command-line argument parsing and handlers
//
// Provides:
// - global flags for the TUI (--demo, --url)
// - config --show/--path/--reset: configuration management
// - posts ...: one-shot zome calls printing JSON, for scripting and debugging

use crate::client::{CallError, Endpoint};
use crate::config::{Config, VERSION};
use crate::posts::{ActionHash, Post, PostsZome, UpdatePostInput};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

/// forum - terminal client for a posts forum
#[derive(Parser, Debug)]
#[command(name = "forum")]
#[command(version = VERSION)]
#[command(about = "Terminal client for a posts forum", long_about = None)]
pub struct Cli {
    /// Use the in-memory demo backend instead of a conductor
    #[arg(long, global = true)]
    pub demo: bool,

    /// Conductor endpoint (overrides config and FORUM_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
    /// Call the posts zome directly and print the result as JSON
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PostsAction {
    /// List the identifiers of all posts
    List,
    /// Fetch the latest record of a post
    Get { hash: String },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Update a post; PREVIOUS must be its latest version
    Update {
        original: String,
        previous: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete a post
    Delete { hash: String },
}

impl Cli {
    /// Apply command-line overrides (highest precedence)
    pub fn apply(&self, config: &mut Config) {
        if self.demo {
            config.demo_mode = true;
        }
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
    }
}

/// Handle `forum config ...`
pub fn handle_config(show: bool, reset: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else {
        // No flag provided, show help
        println!("Usage: forum config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless posts commands
// ─────────────────────────────────────────────────────────────────────────────

/// Backend failures surface as their message, the same text the TUI shows
fn call_failed(what: &'static str) -> impl FnOnce(CallError) -> anyhow::Error {
    move |e| anyhow::anyhow!("{}: {}", what, e.message())
}

fn to_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to encode result")
}

/// Run one posts command and return what it prints
pub async fn run_posts(config: &Config, endpoint: &Endpoint, action: PostsAction) -> Result<String> {
    let client = endpoint
        .connect()
        .await
        .map_err(call_failed("Error connecting"))?;
    let zome = PostsZome::new(client, &config.role_name, &config.zome_name);
    tracing::debug!("posts command {:?}", action);

    match action {
        PostsAction::List => {
            let hashes = zome
                .get_all_posts()
                .await
                .map_err(call_failed("Error fetching the posts"))?;
            to_json(&hashes)
        }
        PostsAction::Get { hash } => {
            let record = zome
                .get_post(&ActionHash::new(hash))
                .await
                .map_err(call_failed("Error fetching the post"))?
                .context("The requested post was not found.")?;
            to_json(&record)
        }
        PostsAction::Create { title, content } => {
            let record = zome
                .create_post(&Post::new(title, content))
                .await
                .map_err(call_failed("Error creating the post"))?;
            to_json(&record)
        }
        PostsAction::Update {
            original,
            previous,
            title,
            content,
        } => {
            let input = UpdatePostInput {
                original_post_hash: ActionHash::new(original),
                previous_post_hash: ActionHash::new(previous),
                updated_post: Post::new(title, content),
            };
            let record = zome
                .update_post(&input)
                .await
                .map_err(call_failed("Error updating the post"))?;
            to_json(&record)
        }
        PostsAction::Delete { hash } => {
            zome.delete_post(&ActionHash::new(hash))
                .await
                .map_err(call_failed("Error deleting the post"))?;
            Ok("null".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryConductor;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = parse(&["forum", "--demo", "--url", "http://other:1"]);
        assert!(cli.command.is_none());

        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.demo_mode);
        assert_eq!(config.url, "http://other:1");
    }

    #[test]
    fn test_parse_posts_update() {
        let cli = parse(&[
            "forum", "posts", "update", "orig", "prev", "--title", "T", "--content", "C",
        ]);
        match cli.command {
            Some(Commands::Posts { action }) => assert_eq!(
                action,
                PostsAction::Update {
                    original: "orig".to_string(),
                    previous: "prev".to_string(),
                    title: "T".to_string(),
                    content: "C".to_string(),
                }
            ),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_create_requires_title_and_content() {
        assert!(Cli::try_parse_from(["forum", "posts", "create", "--title", "T"]).is_err());
    }

    #[tokio::test]
    async fn test_posts_commands_against_memory_backend() {
        let conductor = MemoryConductor::new();
        let endpoint = Endpoint::InMemory(conductor.clone());
        let config = Config::default();

        let created = run_posts(
            &config,
            &endpoint,
            PostsAction::Create {
                title: "Hello".to_string(),
                content: "World".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(created.contains("signed_action"));

        let hash = conductor.post_hashes()[0].clone();
        let listed = run_posts(&config, &endpoint, PostsAction::List).await.unwrap();
        assert!(listed.contains(hash.as_str()));

        run_posts(
            &config,
            &endpoint,
            PostsAction::Delete {
                hash: hash.as_str().to_string(),
            },
        )
        .await
        .unwrap();
        let listed = run_posts(&config, &endpoint, PostsAction::List).await.unwrap();
        assert_eq!(listed, "[]");
    }

    #[tokio::test]
    async fn test_errors_carry_backend_message() {
        let conductor = MemoryConductor::new();
        conductor.fail_next("get_all_posts", "network partition");
        let endpoint = Endpoint::InMemory(conductor);

        let err = run_posts(&Config::default(), &endpoint, PostsAction::List)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error fetching the posts: network partition");
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let endpoint = Endpoint::InMemory(MemoryConductor::new());
        let err = run_posts(
            &Config::default(),
            &endpoint,
            PostsAction::Get {
                hash: "uhCkkmissing".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "The requested post was not found.");
    }
}
