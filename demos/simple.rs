use chessbot_client::{
    BackendConfig, HttpBackend, Mode, Session, SessionConfig, decode, pawns, project,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Connect to a locally running chessbot service
    let backend = HttpBackend::new(BackendConfig::default())?;
    println!("Using service at '{}'.", backend.config().base_url);

    // 2. Open a board in play mode
    let config = SessionConfig {
        mode: Mode::Play,
        ..Default::default()
    };
    let mut session = Session::new(backend, config);
    session.start().await;

    // 3. Play a few moves; the bot answers each one
    for encoded in ["e2e4", "g1f3", "f1c4"] {
        let request = decode(encoded)?;
        match session.drop_piece(request).await {
            Ok(fen) => println!("{encoded} -> {fen}"),
            Err(err) => println!("{encoded} rejected: {err}"),
        }

        // 4. Output the evaluation
        let score = session.display_score();
        println!(
            "Evaluation: {:+.2} pawns, white share of the bar {:.1}%",
            pawns(score),
            project(score) * 100.0
        );
    }

    Ok(())
}
