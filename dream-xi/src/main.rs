// Dream XI entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build match data providers
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Spawn printer task
// 7. Read console commands until quit, EOF, or Ctrl+C
// 8. Cleanup on exit

use dream_xi::app;
use dream_xi::config;
use dream_xi::console;
use dream_xi::protocol::UserCommand;
use dream_xi::provider::Providers;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Dream XI starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: provider={:?}, participants={:?}",
        config.provider.kind, config.participants.names
    );

    // 3. Build match data providers
    let providers = Providers::from_config(&config).context("failed to set up match data")?;

    // 4. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    let participants = config.participants.clone();
    let app_state = app::AppState::new(config, providers);

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Spawn printer task; ends when the app loop drops its sender
    let printer_handle = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            print!("{}", console::render(&update, &participants));
        }
    });

    // 7. Read console commands
    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received");
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        };

        match console::parse_command(&line) {
            Ok(Some(cmd)) => {
                let quit = cmd == UserCommand::Quit;
                if cmd_tx.send(cmd).await.is_err() || quit {
                    break;
                }
            }
            Ok(None) => {
                if !line.trim().is_empty() {
                    println!("{}", console::HELP);
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    // 8. Cleanup: ask the app loop to stop, then wait for both tasks (with timeout)
    let _ = cmd_tx.send(UserCommand::Quit).await;
    drop(cmd_tx);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
        let _ = printer_handle.await;
    })
    .await;

    info!("Dream XI shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file, keeping the terminal for the console.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("dream-xi.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dream_xi=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
