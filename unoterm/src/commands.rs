use color_eyre::{eyre::eyre, Result};
use convert_case::{Case, Converter};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use unoflow::card::CardColor;

#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
enum Keyword {
    Play,
    Draw,
    UNO,
    Hand,
    Refresh,
    NewGame,
    Help,
    Quit,
}

impl Keyword {
    fn word(&self) -> String {
        let converter = Converter::new()
            .from_case(Case::Pascal)
            .to_case(Case::Kebab);
        converter.convert(format!("{self}")).to_lowercase()
    }

    fn usage(&self) -> &'static str {
        match self {
            Keyword::Play => "play <n>        play card number n of the current hand",
            Keyword::Draw => "draw            draw a card and pass",
            Keyword::UNO => "uno             call UNO while the countdown runs",
            Keyword::Hand => "hand            show the table again",
            Keyword::Refresh => "refresh         reload hands and top card from the server",
            Keyword::NewGame => "new-game <a> <b> <c> <d>  start over with four players",
            Keyword::Help => "help            list commands",
            Keyword::Quit => "quit            leave",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// One-based position in the current player's hand.
    Play(usize),
    Draw,
    Uno,
    Hand,
    Refresh,
    NewGame(Vec<String>),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Err(eyre!("Type a command, `help` lists them"));
        };
        let first = first.to_lowercase();
        let keyword = Keyword::iter()
            .find(|keyword| keyword.word() == first)
            .ok_or_else(|| eyre!("Unknown command `{first}`"))?;

        Ok(match keyword {
            Keyword::Play => {
                let position = words
                    .next()
                    .ok_or_else(|| eyre!("Which card? Usage: {}", keyword.usage()))?
                    .parse::<usize>()
                    .map_err(|_| eyre!("Card numbers start at 1"))?;
                if position == 0 {
                    return Err(eyre!("Card numbers start at 1"));
                }
                Command::Play(position)
            }
            Keyword::Draw => Command::Draw,
            Keyword::UNO => Command::Uno,
            Keyword::Hand => Command::Hand,
            Keyword::Refresh => Command::Refresh,
            Keyword::NewGame => Command::NewGame(words.map(str::to_string).collect()),
            Keyword::Help => Command::Help,
            Keyword::Quit => Command::Quit,
        })
    }
}

pub fn help() -> String {
    Keyword::iter()
        .map(|keyword| format!("  {}", keyword.usage()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads a color answer, either its name or its first letter.
pub fn parse_color(answer: &str) -> Option<CardColor> {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return None;
    }
    CardColor::iter().find(|color| {
        let name = color.to_string().to_lowercase();
        name == answer || (answer.len() == 1 && name.starts_with(&answer))
    })
}
