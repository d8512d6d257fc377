use clap::{ArgAction, Parser, Subcommand};
use herald_api::{
    DEFAULT_LOCAL_PEER, DeliveryFailure, MessageReceived, NoListener, PeerUid, Target,
    no_listener_reply, parse_no_listener_reply,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const LOCAL_PEER_ENV: &str = "HERALD_LOCAL_PEER";

#[derive(Parser, Debug)]
#[command(name = "herald-cli")]
#[command(about = "Build and inspect Herald no-listener replies")]
struct Cli {
    /// Peer UID recorded as the target of locally raised failures.
    #[arg(long, global = true)]
    local_peer: Option<PeerUid>,
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Notice(NoticeArgs),
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
struct NoticeArgs {
    /// Peer UID, `group:<name>`, or a comma-separated peer list.
    #[arg(long)]
    target: Option<Target>,
    #[arg(long)]
    uid: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct InspectArgs {
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    source: Option<String>,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let local_peer = resolve_local_peer(cli.local_peer, std::env::var(LOCAL_PEER_ENV).ok());
    let result = match cli.command {
        Commands::Notice(args) => notice_command(args, &local_peer),
        Commands::Inspect(args) => inspect_command(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_local_peer(flag: Option<PeerUid>, env: Option<PeerUid>) -> PeerUid {
    let non_blank = |peer: &PeerUid| !peer.trim().is_empty();
    flag.filter(non_blank)
        .or_else(|| env.filter(non_blank))
        .unwrap_or_else(|| DEFAULT_LOCAL_PEER.to_string())
}

fn notice_command(args: NoticeArgs, local_peer: &str) -> Result<(), String> {
    if args.uid.trim().is_empty() {
        return Err("--uid must not be empty".to_string());
    }
    let target = args.target.unwrap_or_else(|| Target::peer(local_peer));
    let error = NoListener::new(target, args.uid, args.subject);
    tracing::debug!(peer = %error.target(), uid = error.uid(), "built no-listener failure");

    if args.json {
        let reply = no_listener_reply(&error).map_err(|error| error.to_string())?;
        let output = json!({
            "target": error.target().to_string(),
            "reply": reply,
        });
        let encoded = serde_json::to_string_pretty(&output).map_err(|error| error.to_string())?;
        println!("{encoded}");
    } else {
        println!("target: {}", error.target());
        println!("uid: {}", error.uid());
        println!("subject: {}", error.subject());
        println!("description: {}", error.describe());
    }
    Ok(())
}

fn inspect_command(args: InspectArgs) -> Result<(), String> {
    let source = load_source(args.file.as_deref(), args.source.as_deref())?;
    let received: MessageReceived =
        serde_json::from_str(&source).map_err(|error| format!("invalid message json: {error}"))?;
    let error = parse_no_listener_reply(&received).map_err(|error| error.to_string())?;
    tracing::debug!(sender = %received.sender, uid = error.uid(), "decoded no-listener reply");

    println!("target: {}", error.target());
    println!("uid: {}", error.uid());
    println!("subject: {}", error.subject());
    println!("description: {}", error.message());
    Ok(())
}

fn load_source(file: Option<&Path>, source: Option<&str>) -> Result<String, String> {
    match (file, source) {
        (Some(_), Some(_)) => Err("use either --file or --source, not both".to_string()),
        (Some(path), None) => std::fs::read_to_string(path)
            .map_err(|error| format!("failed to read {}: {error}", path.display())),
        (None, Some(source)) => Ok(source.to_string()),
        (None, None) => Err("one of --file or --source is required".to_string()),
    }
}
