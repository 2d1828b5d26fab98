//! Interactive answers.
//!
//! Parsing is kept apart from terminal I/O: [`parse_threshold`] and
//! [`is_confirmation`] are pure, while the `read_*` helpers work on any
//! `BufRead`/`Write` pair so runs can be driven from tests.

use std::io::{BufRead, Write};

use crate::error::PromptError;

/// Minimum saved-track counts an artist or album must reach to be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub artist: i64,
    pub album: i64,
}

/// Parses a threshold answer, ignoring surrounding whitespace.
pub fn parse_threshold(input: &str) -> Result<i64, PromptError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| PromptError::NotANumber(trimmed.to_string()))
}

/// Accepts `y` or `yes` in any case; every other answer declines.
pub fn is_confirmation(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Writes `question` and returns the next line of input without its newline.
///
/// End of input yields an empty answer.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<String, PromptError> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks for both thresholds, then validates them.
pub fn read_thresholds<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Thresholds, PromptError> {
    let artist = ask(input, output, "How many tracks should I look for per artist?: ")?;
    let album = ask(input, output, "How many tracks should I look for per album?: ")?;

    Ok(Thresholds {
        artist: parse_threshold(&artist)?,
        album: parse_threshold(&album)?,
    })
}

pub fn read_confirmation<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<bool, PromptError> {
    let answer = ask(
        input,
        output,
        "Would you like me to proceed with adding these to your library (Y/N)? ",
    )?;
    Ok(is_confirmation(&answer))
}
