use std::sync::Arc;

use async_trait::async_trait;
use strum::IntoEnumIterator;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, Mutex},
};
use tracing::{debug, warn};
use unoflow::{card::CardColor, prompt::ColorPrompt};

use crate::commands::parse_color;

/// Lines typed on stdin, shared between the command loop and the color
/// prompt. Whoever holds the lock gets the next line.
#[derive(Clone)]
pub struct Lines {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl Lines {
    pub fn from_stdin() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if sender.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(error) => {
                        warn!(%error, "Could not read from stdin");
                        break;
                    }
                }
            }
            debug!("Input closed");
        });

        Self::from_receiver(receiver)
    }

    pub fn from_receiver(receiver: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// `None` once input is closed.
    pub async fn next(&self) -> Option<String> {
        self.receiver.lock().await.recv().await
    }
}

/// Asks for the wild color on the terminal until a valid color is typed.
pub struct TerminalColorPrompt {
    lines: Lines,
}

impl TerminalColorPrompt {
    pub fn new(lines: Lines) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl ColorPrompt for TerminalColorPrompt {
    async fn choose_color(&self) -> Option<CardColor> {
        let choices = CardColor::iter()
            .map(|color| color.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        loop {
            println!("Pick a color ({choices}), or leave empty to take the card back:");
            let line = self.lines.next().await?;
            if line.trim().is_empty() {
                return None;
            }
            match parse_color(&line) {
                Some(color) => return Some(color),
                None => println!("`{}` is not a color", line.trim()),
            }
        }
    }
}
