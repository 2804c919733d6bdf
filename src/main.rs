use chessbot_client::{
    BackendConfig, ClientError, DEFAULT_BASE_URL, Depth, HttpBackend, Mode, PositionStore,
    Session, SessionConfig, decode, pawns, render_bar,
};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Analysis,
    Play,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Analysis => Mode::Analysis,
            ModeArg::Play => Mode::Play,
        }
    }
}

#[derive(Parser)]
struct Args {
    /// Base URL of the chessbot service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Depth the bot searches at (1-8)
    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Depth used to evaluate positions (1-8)
    #[arg(long, default_value_t = 2)]
    eval_depth: u32,

    /// Analyse positions, or play against the bot
    #[arg(short, long, value_enum, default_value = "analysis")]
    mode: ModeArg,

    /// Search time limit forwarded to the service
    #[arg(long)]
    movetime_ms: Option<u32>,

    /// Start from this position instead of the standard one
    #[arg(long)]
    fen: Option<String>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

const HELP: &str = "\
commands:
  <move>              e.g. e2e4, e7e8q
  undo                take back the last move
  reset               back to the starting position
  mode analysis|play  switch mode (no argument toggles)
  depth <n>           bot depth, 1-8
  + / -               bot depth up / down
  fen                 print the current position
  quit";

fn print_status(session: &Session<HttpBackend>) {
    let score = session.display_score();
    println!("{}", session.fen());
    println!(
        "{} {:+.2} pawns  (mode {}, depth {})",
        render_bar(score, 32),
        pawns(score),
        session.mode(),
        session.depth()
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let backend = HttpBackend::new(BackendConfig {
        base_url: args.api_url,
        movetime_ms: args.movetime_ms,
        ..Default::default()
    })?;
    let config = SessionConfig {
        mode: args.mode.into(),
        bot_depth: Depth::new(args.depth),
        eval_depth: Depth::new(args.eval_depth),
    };
    let store = match &args.fen {
        Some(fen) => PositionStore::from_fen(fen)?,
        None => PositionStore::new(),
    };
    info!(url = %backend.config().base_url, "Connecting to chessbot service");

    let mut session = Session::with_store(backend, config, store);
    session.start().await;
    println!("{HELP}");
    print_status(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match (command, words.next()) {
            ("quit" | "exit", _) => break,
            ("help", _) => println!("{HELP}"),
            ("fen", _) => println!("{}", session.fen()),
            ("undo", _) => {
                if let Err(ClientError::NoHistory) = session.undo().await {
                    println!("nothing to undo");
                }
            }
            ("reset", _) => {
                session.reset().await;
            }
            ("mode", Some("play")) => session.set_mode(Mode::Play),
            ("mode", Some("analysis")) => session.set_mode(Mode::Analysis),
            ("mode", None) => session.set_mode(session.mode().toggled()),
            ("depth", Some(n)) => match n.parse::<u32>() {
                Ok(n) => session.set_depth(Depth::new(n)),
                Err(_) => println!("depth must be a number"),
            },
            ("+", _) => session.set_depth(session.depth().increment()),
            ("-", _) => session.set_depth(session.depth().decrement()),
            _ => {
                let encoded: String = line.split_whitespace().collect();
                match decode(&encoded) {
                    Ok(request) => {
                        if let Err(err) = session.drop_piece(request).await {
                            println!("{err}");
                        }
                    }
                    Err(_) => {
                        println!("unknown command {:?}, try \"help\"", line.trim());
                        continue;
                    }
                }
            }
        }
        print_status(&session);
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
