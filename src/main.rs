use clap::{Parser, Subcommand};
use press_front::api::client::MAX_PER_PAGE;
use press_front::api::{ContentClient, PostQuery, PublishClient};
use press_front::config::{self, DEFAULT_CONFIG_FILE, Settings};
use press_front::draft::PostDraft;
use press_front::types::PostStatus;
use press_front::{generate, output};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "press-front")]
#[command(about = "Static front end and publishing tool for a WordPress blog")]
#[command(long_about = "\
Static front end and publishing tool for a WordPress blog

WordPress stays the editor; press-front reads its REST API and writes a
plain HTML site. Markdown typed into the editor (headings, emphasis,
fenced code, lists, quotes) is rendered as real markup.

Output structure:

  dist/
  ├── index.html                 # Newest posts, paginated under page/N/
  ├── posts/<slug>/index.html    # One page per post
  ├── category/<slug>/index.html # Posts in a category
  ├── tag/<slug>/index.html      # Posts with a tag
  └── feed.xml                   # RSS 2.0

Configuration is read from the environment first, then from press-front.toml
(or --config):

  WORDPRESS_API_URL        Site root, e.g. https://cms.example.com (required)
  WORDPRESS_USERNAME       Account used by `publish`
  WORDPRESS_APP_PASSWORD   Application password for that account
  SITE_TITLE, SITE_URL     Public site title and address

Run 'press-front gen-config' to generate a documented press-front.toml.")]
#[command(version = env!("PRESS_FRONT_VERSION"))]
struct Cli {
    /// Config file (default: press-front.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch all content and write the static site
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// List posts, newest first
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Posts per page (max 100)
        #[arg(long)]
        per_page: Option<u32>,
        /// Only posts in this category
        #[arg(long)]
        category: Option<String>,
        /// Only posts with this tag
        #[arg(long)]
        tag: Option<String>,
        /// Full-text search
        #[arg(long)]
        search: Option<String>,
    },
    /// Publish a Markdown draft (default: the bundled welcome post)
    Publish {
        /// Draft file with `+++` TOML front matter
        file: Option<PathBuf>,
        /// Create the post as a draft regardless of its front matter
        #[arg(long)]
        draft: bool,
    },
    /// Validate the configuration and check the API answers
    Check,
    /// Print a documented press-front.toml
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_file = resolve_config_file(cli.config.as_deref());
    let load_settings = || config::load_config(config_file.as_deref());

    match cli.command {
        Command::Build { output: out_dir } => {
            let settings = load_settings()?;
            println!("==> Building {} → {}", settings.api.url, out_dir.display());
            let report = generate::build(&settings, &out_dir)?;
            output::print_generate_report(&report);
            println!("==> Build complete: {}", out_dir.display());
        }
        Command::List {
            page,
            per_page,
            category,
            tag,
            search,
        } => {
            let settings = load_settings()?;
            let client = ContentClient::from_config(&settings.api)?;
            let per_page = per_page
                .unwrap_or(settings.api.per_page)
                .clamp(1, MAX_PER_PAGE);
            let mut query = PostQuery::default().page(page).per_page(per_page);
            if let Some(slug) = category {
                match client.get_category_by_slug(&slug)? {
                    Some(term) => query = query.category(term.id),
                    None => return Err(format!("Unknown category: {slug}").into()),
                }
            }
            if let Some(slug) = tag {
                match client.get_tag_by_slug(&slug)? {
                    Some(term) => query = query.tag(term.id),
                    None => return Err(format!("Unknown tag: {slug}").into()),
                }
            }
            if let Some(text) = search {
                query = query.search(&text);
            }
            let listing = client.get_posts_page(&query)?;
            output::print_post_list(&listing, page, per_page);
        }
        Command::Publish { file, draft } => {
            let settings = load_settings()?;
            if let Err(e) = publish(&settings, file.as_deref(), draft) {
                error!("publish failed: {e}");
                return Err(e);
            }
        }
        Command::Check => {
            let settings = load_settings()?;
            println!("==> Checking {}", settings.api.url);
            let client = ContentClient::from_config(&settings.api)?;
            let categories = client.get_categories()?;
            output::print_check(&settings, config_file.as_deref(), categories.len());
        }
        Command::GenConfig => {
            print!("{}", config::config_template());
        }
    }

    Ok(())
}

/// Authenticate, resolve the category and create the post.
fn publish(
    settings: &Settings,
    file: Option<&Path>,
    force_draft: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = settings.credentials()?;
    let mut post = match file {
        Some(path) => PostDraft::load(path)?,
        None => PostDraft::welcome()?,
    };
    if force_draft {
        post.status = PostStatus::Draft;
    }

    let client = PublishClient::from_config(&settings.api, &credentials)?;
    let category_id = match &post.category {
        Some(name) => {
            let id = client.get_or_create_category(name)?;
            info!(category = %name, id, "category resolved");
            Some(id)
        }
        None => None,
    };

    let published = client.create_post(&post.to_new_post(category_id))?;
    info!(id = published.id, "post created");
    output::print_published(&published);
    Ok(())
}

/// An explicit `--config` is used as given; otherwise the default file is
/// picked up only when it exists.
fn resolve_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}
