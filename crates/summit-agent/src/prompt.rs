//! Interactive preference questions.

use dialoguer::Confirm;
use summit_common::Attribute;
use summit_ranker::Preferences;

use crate::config::PreferenceConfig;

pub fn question(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::RunCount => "Are you looking for a resort with a higher number of runs?",
        Attribute::Price => "Are you looking for cheaper lift ticket prices?",
        Attribute::PeakElevation => "Are you looking for a resort with a higher peak elevation?",
    }
}

/// Fill the unanswered preferences with `ask`.
pub fn resolve<F>(known: PreferenceConfig, mut ask: F) -> anyhow::Result<Preferences>
where
    F: FnMut(Attribute) -> anyhow::Result<bool>,
{
    let mut answer = |value: Option<bool>, attribute: Attribute| match value {
        Some(v) => Ok(v),
        None => ask(attribute),
    };
    Ok(Preferences::new(
        answer(known.runs, Attribute::RunCount)?,
        answer(known.price, Attribute::Price)?,
        answer(known.elevation, Attribute::PeakElevation)?,
    ))
}

/// Ask on the terminal.
pub fn confirm(attribute: Attribute) -> anyhow::Result<bool> {
    let answer = Confirm::new()
        .with_prompt(question(attribute))
        .default(true)
        .interact()?;
    Ok(answer)
}
