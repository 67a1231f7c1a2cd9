//! Command-token parser for scripted play.
//!
//! A script is a whitespace-separated token list, e.g.
//! `n e collect deposit:0,1#0@2,2 status`. Cell references use the
//! canonical `i,j` key, coin references `i,j#serial`. Collect and deposit
//! default to the player's current cell when no target is given.

use geocoin_game::{Cell, CoinId, CoinPick};
use thiserror::Error;

/// One parsed token. Targets stay optional until execution time, when the
/// player's current cell is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOp {
    Move { di: i32, dj: i32 },
    Collect { cell: Option<Cell>, pick: CoinPick },
    Deposit { coin: CoinId, cell: Option<Cell> },
    Reset,
    Status,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command token {token:?}")]
    UnknownToken { token: String },
    #[error("bad cell reference in {token:?}")]
    BadCell { token: String },
    #[error("bad coin reference in {token:?}")]
    BadCoin { token: String },
}

fn parse_cell(raw: &str, token: &str) -> Result<Cell, ScriptError> {
    raw.parse().map_err(|_| ScriptError::BadCell {
        token: token.to_string(),
    })
}

fn parse_collect(token: &str, pick: CoinPick, rest: Option<&str>) -> Result<ScriptOp, ScriptError> {
    let cell = match rest {
        Some(raw) => Some(parse_cell(raw, token)?),
        None => None,
    };
    Ok(ScriptOp::Collect { cell, pick })
}

fn parse_deposit(token: &str, spec: &str) -> Result<ScriptOp, ScriptError> {
    let (coin_raw, cell_raw) = match spec.split_once('@') {
        Some((coin, cell)) => (coin, Some(cell)),
        None => (spec, None),
    };
    let coin: CoinId = coin_raw.parse().map_err(|_| ScriptError::BadCoin {
        token: token.to_string(),
    })?;
    let cell = match cell_raw {
        Some(raw) => Some(parse_cell(raw, token)?),
        None => None,
    };
    Ok(ScriptOp::Deposit { coin, cell })
}

/// Parse a full script into ops, failing on the first bad token.
///
/// # Errors
///
/// Returns a [`ScriptError`] describing the offending token.
pub fn parse_script(input: &str) -> Result<Vec<ScriptOp>, ScriptError> {
    input.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<ScriptOp, ScriptError> {
    let (head, rest) = match token.split_once(':') {
        Some((head, rest)) => (head, Some(rest)),
        None => (token, None),
    };
    match (head, rest) {
        ("n" | "north", None) => Ok(ScriptOp::Move { di: 1, dj: 0 }),
        ("s" | "south", None) => Ok(ScriptOp::Move { di: -1, dj: 0 }),
        ("e" | "east", None) => Ok(ScriptOp::Move { di: 0, dj: 1 }),
        ("w" | "west", None) => Ok(ScriptOp::Move { di: 0, dj: -1 }),
        ("collect", rest) => parse_collect(token, CoinPick::First, rest),
        ("collect-all", rest) => parse_collect(token, CoinPick::All, rest),
        ("deposit", Some(spec)) => parse_deposit(token, spec),
        ("reset", None) => Ok(ScriptOp::Reset),
        ("status", None) => Ok(ScriptOp::Status),
        _ => Err(ScriptError::UnknownToken {
            token: token.to_string(),
        }),
    }
}
