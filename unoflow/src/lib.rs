pub mod callout;
pub mod card;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod legality;
pub mod player;
pub mod prompt;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod snapshot;
pub mod table;
pub mod turn;
