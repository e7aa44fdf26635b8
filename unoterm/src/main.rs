mod commands;
mod http;
mod input;
mod render;

use std::env::{self, var};

use color_eyre::Result;
use commands::Command;
use futures::future;
use http::{HttpGameServer, DEFAULT_SERVER_URL};
use input::{Lines, TerminalColorPrompt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use unoflow::{
    config::EngineConfig, controller::TurnController, error::TurnError, snapshot::HandView,
};

type Controller = TurnController<HttpGameServer, TerminalColorPrompt>;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env()?;
    let base_url = var("UNO_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    info!(%base_url, ?config, "Starting");

    let lines = Lines::from_stdin();
    let mut controller = TurnController::new(
        HttpGameServer::new(base_url),
        TerminalColorPrompt::new(lines.clone()),
        config,
    );

    let mut names: Vec<String> = env::args().skip(1).collect();
    if names.is_empty() {
        println!("Four player names, separated by spaces or commas:");
        let line = lines.next().await.unwrap_or_default();
        names = split_names(&line);
    }
    controller.start_game(names).await?;
    show(&controller);
    println!("{}", commands::help());

    run(&mut controller, &lines).await;
    controller.end_game();
    Ok(())
}

fn split_names(line: &str) -> Vec<String> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

async fn run(controller: &mut Controller, lines: &Lines) {
    loop {
        let deadline = controller.call_out_deadline();
        let expiry = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            line = lines.next() => {
                let Some(line) = line else {
                    info!("Input closed, leaving");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(controller, command).await,
                    Err(error) => println!("{error}"),
                }
            }
            _ = expiry => {
                match controller.expire_call_out().await {
                    Ok(Some(resolution)) => {
                        println!("{}", render::call_out(&resolution));
                        show(controller);
                    }
                    Ok(None) => {}
                    Err(error) => warn!(%error, "Call-out expiry failed"),
                }
            }
        }
    }
}

async fn execute(controller: &mut Controller, command: Command) {
    let result = match command {
        Command::Play(position) => play(controller, position).await,
        Command::Draw => controller.draw().await.map(|outcome| render::draw(&outcome)),
        Command::Uno => controller
            .acknowledge_call_out()
            .await
            .map(|resolution| match resolution {
                Some(resolution) => render::call_out(&resolution),
                None => "Nobody has to call UNO right now".to_string(),
            }),
        Command::Hand => Ok(String::new()),
        Command::Refresh => controller.refresh().await.map(|report| {
            if report.failed.is_empty() {
                "Table reloaded".to_string()
            } else {
                format!("Could not reload {}", report.failed.join(", "))
            }
        }),
        Command::NewGame(names) => controller
            .start_game(names)
            .await
            .map(|()| "New game started".to_string()),
        Command::Help => Ok(commands::help()),
        Command::Quit => return,
    };

    match result {
        Ok(message) => {
            if !message.is_empty() {
                println!("{message}");
            }
            show(controller);
        }
        Err(error) if error.is_silent() => {}
        Err(error) => println!("{error}"),
    }
}

/// Plays the card at `position` in the current player's hand.
async fn play(controller: &mut Controller, position: usize) -> Result<String, TurnError> {
    let snapshot = controller.snapshot().ok_or(TurnError::NoActiveGame)?;
    let player = snapshot.current_player.ok_or(TurnError::NoActiveGame)?;

    let card = snapshot
        .seats
        .iter()
        .find(|seat| seat.name == player)
        .and_then(|seat| match &seat.hand {
            HandView::FaceUp(cards) => cards.get(position.saturating_sub(1)).copied(),
            HandView::FaceDown(_) => None,
        })
        .ok_or_else(|| TurnError::CardNotInHand(player.clone()))?;

    let outcome = controller.play_card(&player, card).await?;
    Ok(render::play(&player, &outcome))
}

fn show(controller: &Controller) {
    if let Some(snapshot) = controller.snapshot() {
        print!("{}", render::table(&snapshot));
    }
}
