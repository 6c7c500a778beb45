use clap::{Parser, Subcommand};
use posts_client::{PostPatch, PostsClient};

#[derive(Parser, Debug)]
#[clap(about = "Manage blog posts on a posts server")]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every post
    List,
    Create {
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        content: Option<String>,
    },
    /// Change the given fields of a post, leaving the others as they are
    Update {
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        content: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let client = PostsClient::connect(&args.server)?;

    match args.command {
        Command::List => {
            let posts = client.list_posts().await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!("{}", post);
            }
        }
        Command::Create { title, content } => {
            let post = client
                .create_post(&PostPatch {
                    title,
                    content,
                    ..Default::default()
                })
                .await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Update { id, title, content } => {
            let post = client
                .update_post(
                    &id,
                    &PostPatch {
                        title,
                        content,
                        ..Default::default()
                    },
                )
                .await?;
            println!("Post updated: {}", post);
        }
        Command::Delete { id } => {
            let message = client.delete_post(&id).await?;
            println!("{}", message);
        }
    }

    Ok(())
}
