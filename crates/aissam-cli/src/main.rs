use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::debug;

use aissam_client::{
    ApiClient, ApiClientTrait, ClientConfig, ImageAttachment, Message, MessageDraft,
    NewChatSession, NewUser,
};
use aissam_render::{render, DisplayMode, PlainTypesetter, RenderedPart};

#[derive(Parser)]
#[command(name = "aissam")]
#[command(about = "Command-line client for the AISSAM tutoring service")]
#[command(version)]
struct Cli {
    /// Backend base URL (falls back to AISSAM_API_BASE, then localhost)
    #[arg(long)]
    api_base: Option<String>,

    /// Bearer token from a previous login
    #[arg(long, env = "AISSAM_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account, then log in
    Register {
        email: String,
        name: String,
        /// School grade, e.g. 고2
        grade: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print the access token
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List available subjects
    Subjects,
    /// List your chat sessions
    Sessions,
    /// Start a new chat session
    NewSession {
        subject_id: i64,
        title: Option<String>,
    },
    /// Print a session's messages
    History { session_id: i64 },
    /// Send a message and print the tutor's reply
    Send {
        /// Session to send into
        #[arg(long, conflicts_with = "subject")]
        session: Option<i64>,
        /// Start a new session under this subject instead
        #[arg(long)]
        subject: Option<i64>,
        /// Attach an image file
        #[arg(long)]
        image: Option<PathBuf>,
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.api_base.as_deref() {
        Some(base) => ClientConfig::new(base),
        None => ClientConfig::from_env(),
    };
    debug!("Using API base {}", config.api_base);

    let client = match cli.token.as_deref() {
        Some(token) => ApiClient::with_token(config, token)?,
        None => ApiClient::new(config)?,
    };

    match cli.command {
        Commands::Register {
            email,
            name,
            grade,
            password,
        } => {
            let user = client
                .register(&NewUser {
                    email: email.clone(),
                    name,
                    password: password.clone(),
                    grade,
                })
                .await?;
            println!("Registered {} ({})", user.name.bold(), user.email);
            let token = client.login(&email, &password).await?;
            print_token(&token.access_token);
        }
        Commands::Login { email, password } => {
            let token = client.login(&email, &password).await?;
            print_token(&token.access_token);
        }
        Commands::Subjects => {
            for subject in client.subjects().await? {
                println!(
                    "{:>4}  {} {}  {}",
                    subject.id,
                    subject.icon,
                    subject.name.bold(),
                    subject.color.dimmed()
                );
            }
        }
        Commands::Sessions => {
            for session in client.sessions().await? {
                println!(
                    "{:>4}  [{}] {}  {}",
                    session.id,
                    session.subject.name,
                    session.title.bold(),
                    format!("{} messages", session.message_count).dimmed()
                );
            }
        }
        Commands::NewSession { subject_id, title } => {
            let session = client
                .create_session(&NewChatSession { subject_id, title })
                .await?;
            println!("Created session {}: {}", session.id, session.title.bold());
        }
        Commands::History { session_id } => {
            for message in client.messages(session_id).await? {
                print_message(&message);
            }
        }
        Commands::Send {
            session,
            subject,
            image,
            text,
        } => {
            let mut draft = MessageDraft::text(text);
            if let Some(path) = image {
                draft = draft.with_image(load_attachment(&path)?);
            }
            if draft.is_empty() {
                bail!("nothing to send");
            }

            let session_id = match (session, subject) {
                (Some(id), _) => id,
                (None, Some(subject_id)) => {
                    // Same rule as the web client: a session started by its
                    // first message takes its title from that message.
                    let session = client
                        .create_session(&NewChatSession {
                            subject_id,
                            title: Some(draft.derived_title()),
                        })
                        .await?;
                    println!("Started session {}: {}", session.id, session.title.bold());
                    session.id
                }
                (None, None) => bail!("pass --session <id> or --subject <id>"),
            };

            match client.send_message(session_id, draft).await {
                Ok(exchange) => {
                    print_message(&exchange.user_message);
                    print_message(&exchange.ai_response);
                }
                Err(failure) => {
                    eprintln!("{} {}", "Send failed:".red().bold(), failure.error);
                    eprintln!("Your draft was kept:\n{}", failure.draft.content);
                    bail!("message not sent");
                }
            }
        }
    }

    Ok(())
}

fn print_token(access_token: &str) {
    println!("Logged in.");
    println!("{access_token}");
    println!(
        "{}",
        format!("export AISSAM_TOKEN={access_token}").dimmed()
    );
}

fn print_message(message: &Message) {
    let who = if message.is_user {
        "you".purple().bold()
    } else {
        "tutor".green().bold()
    };
    let when = message
        .created_at
        .with_timezone(&chrono::Local)
        .format("%m-%d %H:%M");
    println!("[{when}] {who}");
    if let Some(url) = message.image_url.as_ref().or(message.image_path.as_ref()) {
        println!("  {}", format!("(image: {url})").dimmed());
    }
    println!("{}", render_to_terminal(&message.content));
}

/// Flatten rendered parts into terminal text. Math is colored, block math
/// gets its own lines, and a rejected expression shows its raw source.
fn render_to_terminal(content: &str) -> String {
    render(Some(content), &PlainTypesetter)
        .into_iter()
        .map(|part| match part {
            RenderedPart::Text { text } => text,
            RenderedPart::Math {
                mode: DisplayMode::Inline,
                output,
            } => output.cyan().to_string(),
            RenderedPart::Math {
                mode: DisplayMode::Block,
                output,
            } => format!("\n    {}\n", output.cyan().bold()),
            RenderedPart::Fallback { source, error, .. } => {
                format!("{} {}", source.red(), format!("[{error}]").red().dimmed())
            }
        })
        .collect()
}

fn load_attachment(path: &Path) -> Result<ImageAttachment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageAttachment {
        file_name,
        media_type: guess_media_type(path).to_string(),
        bytes,
    })
}

fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type(Path::new("a.PNG")), "image/png");
        assert_eq!(guess_media_type(Path::new("b.jpeg")), "image/jpeg");
        assert_eq!(guess_media_type(Path::new("c.bin")), "application/octet-stream");
        assert_eq!(guess_media_type(Path::new("noext")), "application/octet-stream");
    }
}
