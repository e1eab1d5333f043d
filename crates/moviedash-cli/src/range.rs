//! `MIN..MAX` range arguments.

use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use moviedash_data::Bounds;

/// Parses `MIN..MAX` into inclusive bounds. Either side may be empty.
///
/// # Errors
///
/// Returns an error if the separator is missing, an end does not parse,
/// or `MIN` is greater than `MAX`.
pub fn parse_bounds<T>(s: &str) -> Result<Bounds<T>>
where
    T: FromStr + PartialOrd + Copy + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let (min, max) = s
        .split_once("..")
        .with_context(|| format!("expected MIN..MAX, got {s:?}"))?;

    let min = parse_end::<T>(min)?;
    let max = parse_end::<T>(max)?;

    if let (Some(lo), Some(hi)) = (min, max)
        && lo > hi
    {
        bail!("empty range: {lo} is greater than {hi}");
    }

    Ok(Bounds { min, max })
}

/// Parses one end of a range; blank means open.
fn parse_end<T>(s: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<T>()
        .map(Some)
        .with_context(|| format!("invalid range bound: {s:?}"))
}
