//! Binary entrypoint for the CoBoard CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `status` - print the configured backend and identity
//! - `forums <board>` - list a board's forums with access decisions
//! - `topics <board> <forum>` - list a forum's visible topics and posts
//! - `create-forum` / `create-topic` / `post` / `comment` / `like` - content creation
//! - `access` - manage a forum's access entries
//! - `bookmark` - add or remove a forum bookmark
//! - `profile` / `update-profile` / `signup` - account management
//! - `upload` / `download` - the personal file archive
//!
//! Every mutation command re-checks forum access and the topic schedule
//! before issuing a request, so a locked topic is refused client-side with a
//! clear message. See the library crate docs for module-level details:
//! `coboard::`.
use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{info, warn};

use coboard::api::CoboardClient;
use coboard::config::Config;
use coboard::forum::access::Requester;
use coboard::forum::filter::{filter_forums, filter_topics, visible_topics, ForumSort};
use coboard::forum::schedule::today_local;
use coboard::logutil;
use coboard::models::{
    EmailRequest, ForumPage, LikeTarget, LikeUpdate, NewAnonymousUser, NewComment, NewForum,
    NewPost, NewTopic, ProfilePage, ProfileUpdate, Tag, Topic,
};
use coboard::validation::PendingEntries;

#[derive(Parser)]
#[command(name = "coboard")]
#[command(about = "Command-line client for the CoBoard forum service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter configuration file
    Init,
    /// Show the configured backend and identity
    Status,
    /// List a board's forums with the access decision for your identity
    Forums {
        /// Board name, e.g. "cpe"
        board: String,
        /// Keep only forums whose name starts with this term
        #[arg(short, long)]
        search: Option<String>,
        /// Keep only forums carrying one of these tag ids (repeatable)
        #[arg(short, long)]
        tag: Vec<i64>,
        /// Sort order: "latest" or "popular"
        #[arg(long)]
        sort: Option<String>,
    },
    /// List a forum's visible topics, posts, and comments
    Topics {
        board: String,
        /// Forum slug (or name; it is slugified for the route)
        forum: String,
        /// Keep only topics whose text contains this term
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a forum on a board
    CreateForum {
        board: String,
        /// Forum display name; the URL slug is derived from it
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Access entry granting a cohort ("60") or a member ("60012345");
        /// repeatable. Any entry makes the forum private.
        #[arg(short, long)]
        entry: Vec<String>,
        /// Tag id from the board's tag list (repeatable)
        #[arg(short, long)]
        tag: Vec<i64>,
    },
    /// Update a forum's settings (unset options keep their current value)
    UpdateForum {
        board: String,
        forum: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Topic ordering: 0 = latest, 1 = most likes
        #[arg(long)]
        sort_by: Option<i64>,
        #[arg(long)]
        wallpaper: Option<String>,
    },
    /// Delete a forum you created
    DeleteForum {
        forum_id: i64,
    },
    /// Create a topic in a forum
    CreateTopic {
        board: String,
        forum: String,
        /// Topic text
        text: String,
        /// Publish date (YYYY-MM-DD); hidden until then
        #[arg(long)]
        publish: Option<String>,
        /// Expiry date (YYYY-MM-DD); locked from that day on
        #[arg(long)]
        expires: Option<String>,
    },
    /// Add a post to a topic
    Post {
        board: String,
        forum: String,
        /// Topic to post under
        #[arg(short, long)]
        topic: i64,
        /// Post heading
        head: String,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Comment on a post
    Comment {
        board: String,
        forum: String,
        /// Post to comment on
        #[arg(short, long)]
        post: i64,
        text: String,
    },
    /// Like a post or a comment
    Like {
        board: String,
        forum: String,
        #[arg(long, conflicts_with = "comment")]
        post: Option<i64>,
        #[arg(long)]
        comment: Option<i64>,
    },
    /// Manage a forum's access entries
    Access {
        board: String,
        forum: String,
        #[command(subcommand)]
        action: AccessAction,
    },
    /// Bookmark a forum (or remove the bookmark)
    Bookmark {
        board: String,
        forum: String,
        #[arg(long)]
        remove: bool,
    },
    /// Show a profile (defaults to the configured identity)
    Profile {
        id: Option<String>,
    },
    /// Update the configured profile
    UpdateProfile {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Base64-encoded profile image
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Register a new anonymous user
    Signup {
        aid: String,
        password: String,
        mail: String,
    },
    /// Send the password-reset mail for an account
    ResetMail {
        mail: String,
        /// Newly issued password to deliver
        password: String,
    },
    /// Upload a file to your archive
    Upload {
        path: String,
        /// Attach the file to a post
        #[arg(long)]
        post: Option<i64>,
    },
    /// Download a file from the archive
    Download {
        file_id: i64,
        /// Destination directory
        #[arg(short, long, default_value = ".")]
        out: String,
    },
}

#[derive(Subcommand)]
enum AccessAction {
    /// Validate and add one entry
    Add { entry: String },
    /// Remove every entry equal to the value
    Remove { entry: String },
    /// Clear all entries (the forum becomes open)
    Clear,
    /// List the forum's entries
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes
    // the default file first).
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    logutil::init(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            if tokio::fs::metadata(&cli.config).await.is_ok() {
                bail!("Config file {} already exists; not overwriting", cli.config);
            }
            Config::create_default(&cli.config).await?;
            println!("Created {}", cli.config);
            println!("Fill in [identity] before using commands that create content.");
            Ok(())
        }
        command => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            run_command(command, config).await
        }
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    let requester = config.requester();
    let client = CoboardClient::new(config.api.clone());

    match command {
        Commands::Init => unreachable!("handled before config load"),
        Commands::Status => {
            println!("Backend:  {}", config.api.base_url);
            println!("Timeout:  {}s", config.api.timeout_seconds);
            println!("Identity: {} (role {})", requester.id, requester.role);
            println!("Level:    {}", config.logging.level);
            Ok(())
        }
        Commands::Forums { board, search, tag, sort } => {
            list_forums(&client, &requester, &board, search.as_deref(), &tag, sort).await
        }
        Commands::Topics { board, forum, search } => {
            list_topics(&client, &requester, &board, &forum, search.as_deref()).await
        }
        Commands::CreateForum { board, name, description, entry, tag } => {
            create_forum(&client, &requester, &board, &name, description, &entry, &tag).await
        }
        Commands::UpdateForum { board, forum, name, description, sort_by, wallpaper } => {
            update_forum(&client, &requester, &board, &forum, name, description, sort_by, wallpaper)
                .await
        }
        Commands::DeleteForum { forum_id } => {
            client.delete_forum(&requester.id, forum_id).await?;
            println!("Deleted forum {}", forum_id);
            Ok(())
        }
        Commands::CreateTopic { board, forum, text, publish, expires } => {
            let topic = NewTopic {
                text,
                publish: parse_date_arg(publish.as_deref(), "--publish")?,
                expired: parse_date_arg(expires.as_deref(), "--expires")?,
            };
            let page = open_forum(&client, &requester, &board, &forum).await?;
            let created = client.create_topic(&board, &page.forum.slug(), &topic).await?;
            println!("Created topic {} ({})", created.topic_id, created.text);
            Ok(())
        }
        Commands::Post { board, forum, topic, head, body } => {
            let page = open_forum(&client, &requester, &board, &forum).await?;
            let target = page
                .topics
                .iter()
                .find(|t| t.topic_id == topic)
                .ok_or_else(|| anyhow!("No topic {} in forum {}", topic, page.forum.forum_name))?;
            ensure_interactive(target)?;

            let mut post = NewPost::by(&requester, head);
            post.post_body = body;
            let created = client.create_post(&board, &page.forum.slug(), topic, &post).await?;
            println!("Posted {} under topic {}", created.post_id, topic);
            Ok(())
        }
        Commands::Comment { board, forum, post, text } => {
            let page = open_forum(&client, &requester, &board, &forum).await?;
            let target = page
                .topic_of_post(post)
                .ok_or_else(|| anyhow!("No post {} in forum {}", post, page.forum.forum_name))?;
            ensure_interactive(target)?;

            let comment = NewComment::by(&requester, text);
            let created = client.add_comment(&board, &page.forum.slug(), post, &comment).await?;
            println!("Added comment {}", created.comment_id);
            Ok(())
        }
        Commands::Like { board, forum, post, comment } => {
            let page = open_forum(&client, &requester, &board, &forum).await?;
            let update = match (post, comment) {
                (Some(id), None) => {
                    let target = page
                        .topic_of_post(id)
                        .ok_or_else(|| anyhow!("No post {} in this forum", id))?;
                    ensure_interactive(target)?;
                    LikeUpdate { item_id: id, item_type: LikeTarget::Post }
                }
                (None, Some(id)) => {
                    let target = page
                        .topic_of_comment(id)
                        .ok_or_else(|| anyhow!("No comment {} in this forum", id))?;
                    ensure_interactive(target)?;
                    LikeUpdate { item_id: id, item_type: LikeTarget::Comment }
                }
                _ => bail!("Pass exactly one of --post or --comment"),
            };
            let response = client.update_like(&board, &page.forum.slug(), &update).await?;
            println!("Likes now {}", response.likes);
            Ok(())
        }
        Commands::Access { board, forum, action } => {
            manage_access(&client, &requester, &board, &forum, action).await
        }
        Commands::Bookmark { board, forum, remove } => {
            let page = open_forum(&client, &requester, &board, &forum).await?;
            let slug = page.forum.slug();
            if remove {
                client.delete_bookmark(&board, &slug, &requester).await?;
                println!("Removed bookmark for {}", page.forum.forum_name);
            } else {
                client.add_bookmark(&board, &slug, &requester).await?;
                println!("Bookmarked {}", page.forum.forum_name);
            }
            Ok(())
        }
        Commands::Profile { id } => {
            let id = id.unwrap_or_else(|| requester.id.clone());
            show_profile(&client, &id).await
        }
        Commands::UpdateProfile { username, password, image } => {
            let update = ProfileUpdate {
                student_id: requester.id.clone(),
                username,
                password,
                profile_image: image,
            };
            client.update_profile(&requester.id, &update).await?;
            println!("Profile updated for {}", requester.id);
            Ok(())
        }
        Commands::Signup { aid, password, mail } => {
            let user = NewAnonymousUser { aid, apw: password, aprofile: None, mail };
            let created = client.signup(&user).await?;
            println!("Registered anonymous user {}", created.aid);
            Ok(())
        }
        Commands::ResetMail { mail, password } => {
            let request = EmailRequest { receiver_email: mail, pw: password };
            client.send_mail(&request).await?;
            println!("Reset mail sent");
            Ok(())
        }
        Commands::Upload { path, post } => {
            let receipt = client
                .upload_file(std::path::Path::new(&path), &requester, post)
                .await?;
            println!("Uploaded as {}", receipt.filename);
            Ok(())
        }
        Commands::Download { file_id, out } => {
            let dest = client.download_file(file_id, std::path::Path::new(&out)).await?;
            println!("Saved {}", dest.display());
            Ok(())
        }
    }
}

/// Fetch a forum page and enforce the access decision for the requester.
async fn open_forum(
    client: &CoboardClient,
    requester: &Requester,
    board: &str,
    forum: &str,
) -> Result<ForumPage> {
    let slug = coboard::forum::slugify(forum);
    let page = client.fetch_forum(board, &slug).await?;
    if !page.resolve_access(requester).is_allowed() {
        warn!(
            "Access denied to forum {} for {}",
            logutil::escape_log(&page.forum.forum_name),
            requester.id
        );
        bail!("You do not have access to forum {}", page.forum.forum_name);
    }
    Ok(page)
}

/// Refuse mutations on a topic outside its interactive window.
fn ensure_interactive(topic: &Topic) -> Result<()> {
    let today = today_local();
    let window = topic.window();
    if !window.is_visible(today) {
        bail!("Topic {} is not published yet", topic.topic_id);
    }
    if !window.is_interactive(today) {
        bail!("Topic {} is expired; it can be read but not changed", topic.topic_id);
    }
    Ok(())
}

async fn list_forums(
    client: &CoboardClient,
    requester: &Requester,
    board: &str,
    search: Option<&str>,
    tag_ids: &[i64],
    sort: Option<String>,
) -> Result<()> {
    let sort = match sort.as_deref() {
        Some(s) => Some(s.parse::<ForumSort>().map_err(|e| anyhow!(e))?),
        None => None,
    };

    let page = client.fetch_board(board).await?;
    let links = page.forumtag.clone().unwrap_or_default();
    let listed = filter_forums(&page.forums, search, tag_ids, &links, sort);

    if listed.is_empty() {
        println!("No forums on {} match", board);
        return Ok(());
    }

    for entry in listed {
        let decision = page.resolve_forum_access(entry, requester);
        let marker = if decision.is_allowed() { "open  " } else { "denied" };
        println!(
            "[{}] {:>4}  {}  ({} contributors)",
            marker,
            entry.forum.forum_id,
            entry.forum.forum_name,
            entry.total_contributors
        );
    }
    Ok(())
}

async fn list_topics(
    client: &CoboardClient,
    requester: &Requester,
    board: &str,
    forum: &str,
    search: Option<&str>,
) -> Result<()> {
    let page = open_forum(client, requester, board, forum).await?;
    let today = today_local();

    let visible = visible_topics(&page.topics, today);
    let hidden = page.topics.len() - visible.len();
    let owned: Vec<Topic> = visible.into_iter().cloned().collect();
    let listed = filter_topics(&owned, search, page.forum.sorts_topics_by_likes());

    println!("{}: {} topics", page.forum.forum_name, listed.len());
    for topic in listed {
        let locked = topic.window().is_locked(today);
        let marker = if locked { " [locked]" } else { "" };
        println!("  #{} {}{}", topic.topic_id, topic.text, marker);
        for post in &topic.posts {
            println!(
                "      {} {} (by {}, {} likes, {} comments)",
                post.post_id,
                post.post_head,
                post.creator().unwrap_or("unknown"),
                post.heart.unwrap_or(0),
                post.comments.len()
            );
        }
    }
    if hidden > 0 {
        info!("{} topics not yet published on {}", hidden, today);
    }
    Ok(())
}

async fn create_forum(
    client: &CoboardClient,
    requester: &Requester,
    board: &str,
    name: &str,
    description: Option<String>,
    entries: &[String],
    tag_ids: &[i64],
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Forum name cannot be empty");
    }

    let mut pending = PendingEntries::new();
    for raw in entries {
        pending
            .add(raw)
            .map_err(|e| anyhow!("Invalid access entry {:?}: {}", raw, e))?;
    }

    // Tags must come from the board's own tag list.
    let board_page = client.fetch_board(board).await?;
    let mut tags: Vec<Tag> = Vec::new();
    for id in tag_ids {
        let tag = board_page
            .tags
            .iter()
            .find(|t| t.tag_id == *id)
            .ok_or_else(|| anyhow!("Board {} has no tag {}", board, id))?;
        tags.push(tag.clone());
    }

    let forum = NewForum {
        forum_name: name.to_string(),
        description,
        icon: None,
        wallpaper: Some("#006b62".to_string()),
        access: if pending.is_private() {
            coboard::models::AccessMode::Private
        } else {
            coboard::models::AccessMode::Public
        },
        font: 0,
        sort_by: 0,
        creator_id: requester.id.clone(),
        board: board.to_string(),
        tags,
    };

    let created = client.create_forum(board, &forum).await?;
    let slug = created.slug();
    info!("Created forum {} with slug {}", created.forum_id, slug);

    // Private forums get their entries pushed one by one after creation.
    for entry in pending.values() {
        client.create_access(board, &slug, entry).await?;
    }

    println!("Created forum {} at /coboard/{}/{}", created.forum_name, board, slug);
    if pending.is_private() {
        println!("Private: {} access entries", pending.len());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn update_forum(
    client: &CoboardClient,
    requester: &Requester,
    board: &str,
    forum: &str,
    name: Option<String>,
    description: Option<String>,
    sort_by: Option<i64>,
    wallpaper: Option<String>,
) -> Result<()> {
    let page = open_forum(client, requester, board, forum).await?;
    let slug = page.forum.slug();

    // The settings endpoint takes the full payload; unset options carry the
    // forum's current values forward.
    let has_entries = page.access.as_deref().map(|a| !a.is_empty()).unwrap_or(false);
    let payload = NewForum {
        forum_name: name.unwrap_or_else(|| page.forum.forum_name.clone()),
        description: description.or_else(|| page.forum.description.clone()),
        icon: page.forum.icon.clone(),
        wallpaper: wallpaper.or_else(|| page.forum.wallpaper.clone()),
        access: if has_entries {
            coboard::models::AccessMode::Private
        } else {
            coboard::models::AccessMode::Public
        },
        font: page.forum.font.unwrap_or(0),
        sort_by: sort_by.or(page.forum.sort_by).unwrap_or(0),
        creator_id: page.forum.creator_id.clone(),
        board: board.to_string(),
        tags: page.tags.clone(),
    };

    let updated = client.update_forum(board, &slug, &payload).await?;
    println!("Updated forum {}", updated.forum.forum_name);
    Ok(())
}

async fn manage_access(
    client: &CoboardClient,
    requester: &Requester,
    board: &str,
    forum: &str,
    action: AccessAction,
) -> Result<()> {
    let page = open_forum(client, requester, board, forum).await?;
    let slug = page.forum.slug();
    let current: Vec<String> = page
        .access
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|r| r.user_id.clone())
        .collect();

    match action {
        AccessAction::List => {
            if current.is_empty() {
                println!("{} is open (no access entries)", page.forum.forum_name);
            } else {
                for entry in &current {
                    println!("{}", entry);
                }
            }
            Ok(())
        }
        AccessAction::Add { entry } => {
            coboard::validation::validate_entry(&entry)
                .map_err(|e| anyhow!("Invalid access entry {:?}: {}", entry, e))?;
            client.create_access(board, &slug, &entry).await?;
            println!("Added {}", entry);
            Ok(())
        }
        AccessAction::Remove { entry } => {
            // Removal is by value: the backend only supports clear + re-add,
            // so every instance equal to the value goes.
            let kept: Vec<&String> = current.iter().filter(|v| *v != &entry).collect();
            if kept.len() == current.len() {
                bail!("No entry {:?} on forum {}", entry, page.forum.forum_name);
            }
            client.clear_access(board, &slug).await?;
            for value in &kept {
                client.create_access(board, &slug, value).await?;
            }
            println!("Removed {} ({} entries remain)", entry, kept.len());
            Ok(())
        }
        AccessAction::Clear => {
            client.clear_access(board, &slug).await?;
            println!("{} is now open", page.forum.forum_name);
            Ok(())
        }
    }
}

async fn show_profile(client: &CoboardClient, id: &str) -> Result<()> {
    match client.fetch_profile(id).await? {
        ProfilePage::Se(profile) => {
            println!("SE user {}", profile.sid);
            if let Some(username) = &profile.username {
                println!("Username:  {}", username);
            }
            print_forum_names("Bookmarked", profile.bookmarked.as_deref());
            print_forum_names("Created", profile.created.as_deref());
            if let Some(files) = &profile.files {
                println!("Files:     {}", files.len());
            }
        }
        ProfilePage::Anonymous(profile) => {
            println!("Anonymous user {}", profile.aid);
            println!("Mail:      {}", profile.mail);
            print_forum_names("Bookmarked", profile.bookmarked.as_deref());
            if let Some(files) = &profile.files {
                println!("Files:     {}", files.len());
            }
        }
    }
    Ok(())
}

fn print_forum_names(label: &str, forums: Option<&[coboard::models::Forum]>) {
    if let Some(forums) = forums {
        let names: Vec<&str> = forums.iter().map(|f| f.forum_name.as_str()).collect();
        println!("{}: {}", label, names.join(", "));
    }
}

fn parse_date_arg(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    match value {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| anyhow!("{} expects a YYYY-MM-DD date, got {:?}", flag, raw)),
        None => Ok(None),
    }
}
