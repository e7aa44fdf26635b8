use std::time::Duration;

pub const PLAYER_COUNT: usize = 4;

pub const DRAW_TWO_VALUE: u8 = 10;
pub const SKIP_VALUE: u8 = 11;
pub const REVERSE_VALUE: u8 = 12;
pub const WILD_DRAW_FOUR_VALUE: u8 = 13;
pub const WILD_VALUE: u8 = 14;

/// Color name the server uses for wild cards.
pub const WILD_COLOR_NAME: &str = "Black";

pub(crate) const CALL_OUT_WINDOW: Duration = Duration::from_secs(10);
pub(crate) const COLOR_PROMPT_TIMEOUT: Duration = Duration::from_secs(15);
pub(crate) const CALL_OUT_PENALTY_DRAWS: u8 = 2;
/// Upper bound for any configured wait.
pub(crate) const MAX_WAIT: Duration = Duration::from_secs(60 * 60);

pub(crate) const AVATARS: &[&str] = &[
    "angel",
    "elf",
    "gingerbread-man",
    "grinch",
    "santa-claus",
    "snowman",
    "christmas-bell",
    "christmas-tree",
    "christmas-wreath",
    "deer-rudolph",
    "gift",
    "jumper",
    "nutcracker",
    "reindeer",
    "snowflake",
    "sweater-with-deer",
];
