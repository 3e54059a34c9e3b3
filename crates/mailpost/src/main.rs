//! mailpost: fetch unseen mail and file drafts over IMAP.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod config;
mod draft;
mod message;
mod ops;

use config::Config;
use draft::Draft;

#[derive(Parser)]
#[command(name = "mailpost", version, about = "Fetch unseen mail and file drafts over IMAP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every unseen message in INBOX and print it.
    Fetch,
    /// Compose a draft and file it on the server.
    Draft {
        /// Recipient address.
        #[arg(long)]
        to: String,
        /// Subject line.
        #[arg(long)]
        subject: String,
        /// Body text.
        #[arg(long)]
        body: String,
        /// Sender address. Defaults to the configured account.
        #[arg(long)]
        from: Option<String>,
        /// Mailbox to file the draft into. Must already exist.
        #[arg(long, default_value = "Drafts")]
        mailbox: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailpost=info,mailpost_imap=info".into()),
        )
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Fetch => {
            let emails = ops::fetch_unseen(&config).await?;
            if emails.is_empty() {
                println!("No unseen messages.");
            }
            for email in &emails {
                println!("--- message {} ---", email.seq);
                println!("From: {}", email.from.as_deref().unwrap_or("(unknown)"));
                println!("Subject: {}", email.subject.as_deref().unwrap_or("(none)"));
                println!();
                println!("{}", email.body_text());
            }
        }
        Commands::Draft {
            to,
            subject,
            body,
            from,
            mailbox,
        } => {
            let from = from.unwrap_or_else(|| config.user.clone());
            let draft = Draft::new(from, to).subject(subject).body(body);
            ops::save_draft(&config, &draft, &mailbox).await?;
            println!("Draft filed in {mailbox}.");
        }
    }

    Ok(())
}
