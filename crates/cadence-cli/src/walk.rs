//! Interactive walk-through driven by stdin lines and timer ticks.

use std::time::Duration;

use anyhow::{Context, Result};
use cadence_core::{
    Catalog, RoutineError, StepTicker, Transition, Walkthrough, WalkthroughState,
    display::{Countdown, OperationStatus, SessionSummary, WalkthroughStep},
    walkthrough::TimerState,
};
use log::{debug, warn};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task,
};

use crate::renderer::TerminalRenderer;

const SAVE_ATTEMPTS: u32 = 3;
const SAVE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Done,
    Skip,
    Back,
    Timer,
    Quit,
    Help,
}

impl Key {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "d" | "done" | "y" => Some(Key::Done),
            "s" | "skip" | "n" => Some(Key::Skip),
            "b" | "back" => Some(Key::Back),
            "t" | "timer" => Some(Key::Timer),
            "q" | "quit" => Some(Key::Quit),
            "?" | "h" | "help" => Some(Key::Help),
            _ => None,
        }
    }
}

const PROMPT: &str = "**[d]**one **[s]**kip **[b]**ack **[t]**imer **[q]**uit > ";

const HELP: &str = "\
- `d` mark the step as performed and continue
- `s` skip the step and continue
- `b` go back to the previous step
- `t` start the step's timer
- `q` leave without recording anything
";

/// Runs `walkthrough` until it completes or is abandoned.
///
/// Returns true when a session was recorded.
pub async fn run(
    mut walkthrough: Walkthrough,
    catalog: &Catalog,
    renderer: &TerminalRenderer,
) -> Result<bool> {
    let (mut ticker, mut ticks) = StepTicker::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    present(&walkthrough, renderer)?;

    while walkthrough.is_presenting() {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                match walkthrough.tick(tick) {
                    Some(TimerState::Expired) => {
                        renderer.show(&OperationStatus::notice("Timer finished"))?;
                        renderer.prompt(PROMPT)?;
                    }
                    Some(TimerState::Running(remaining)) if remaining % 30 == 0 => {
                        renderer.show(&OperationStatus::notice(format!(
                            "{} left",
                            Countdown(remaining)
                        )))?;
                    }
                    _ => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("Input closed during walk-through");
                    walkthrough.abandon();
                    break;
                };
                handle_key(&mut walkthrough, &line, renderer)?;
            }
        }
        ticker.sync(&walkthrough);
    }

    match walkthrough.state() {
        WalkthroughState::Completed => {
            finish(&mut walkthrough, catalog, renderer).await?;
            Ok(true)
        }
        _ => {
            renderer.show(&OperationStatus::notice(
                "Walk-through abandoned; nothing was recorded",
            ))?;
            Ok(false)
        }
    }
}

fn present(walkthrough: &Walkthrough, renderer: &TerminalRenderer) -> Result<()> {
    if let Some(view) = walkthrough.view() {
        renderer.render("\n")?;
        renderer.show(&WalkthroughStep(view))?;
        renderer.prompt(PROMPT)?;
    }
    Ok(())
}

fn handle_key(
    walkthrough: &mut Walkthrough,
    input: &str,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let Some(key) = Key::parse(input) else {
        if !input.trim().is_empty() {
            renderer.show(&OperationStatus::notice(format!(
                "Unknown command '{}'; type ? for help",
                input.trim()
            )))?;
        }
        return present(walkthrough, renderer);
    };

    match key {
        Key::Done | Key::Skip => {
            let performed = key == Key::Done;
            match task::block_in_place(|| walkthrough.resolve(performed)) {
                Ok(Transition::Blocked) => {
                    let left = walkthrough
                        .timer()
                        .map_or(0, |timer| timer.remaining_seconds());
                    renderer.show(&OperationStatus::notice(format!(
                        "Timer is running; {} left",
                        Countdown(left)
                    )))?;
                    renderer.prompt(PROMPT)?;
                }
                Ok(Transition::Advanced { .. }) => present(walkthrough, renderer)?,
                Ok(Transition::Completed | Transition::Ignored) => {}
                // Completed but unsaved; retried once the loop ends
                Err(RoutineError::SessionNotSaved { .. }) => {}
                Err(e) => return Err(e).context("Failed to record step"),
            }
        }
        Key::Back => {
            if walkthrough.back() {
                present(walkthrough, renderer)?;
            } else {
                renderer.show(&OperationStatus::notice("Already at the first step"))?;
                renderer.prompt(PROMPT)?;
            }
        }
        Key::Timer => {
            if walkthrough.start_timer() {
                let status = match walkthrough.timer().map(|timer| timer.state()) {
                    Some(TimerState::Running(remaining)) => {
                        format!("Timer started: {}", Countdown(remaining))
                    }
                    _ => "Timer finished".to_string(),
                };
                renderer.show(&OperationStatus::notice(status))?;
            } else if walkthrough.timer_is_running() {
                renderer.show(&OperationStatus::notice("Timer is already running"))?;
            } else {
                renderer.show(&OperationStatus::notice("This step has no timer"))?;
            }
            renderer.prompt(PROMPT)?;
        }
        Key::Quit => {
            walkthrough.abandon();
        }
        Key::Help => {
            renderer.render(HELP)?;
            renderer.prompt(PROMPT)?;
        }
    }
    Ok(())
}

/// Makes sure the completed session reached the store, retrying a few
/// times before giving up loudly.
async fn finish(
    walkthrough: &mut Walkthrough,
    catalog: &Catalog,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let mut attempt = 1;
    while walkthrough.pending_save().is_some() {
        if attempt > SAVE_ATTEMPTS {
            let session_id = walkthrough
                .pending_save()
                .map(|session| session.session_id.clone())
                .unwrap_or_default();
            anyhow::bail!("Session {session_id} could not be saved after {SAVE_ATTEMPTS} attempts");
        }
        warn!("Session not saved yet; attempt {attempt} of {SAVE_ATTEMPTS}");
        tokio::time::sleep(SAVE_RETRY_DELAY).await;
        if let Err(e) = task::block_in_place(|| walkthrough.retry_save()) {
            warn!("{e}");
        }
        attempt += 1;
    }

    if let Some(session) = walkthrough.session() {
        renderer.render("\n")?;
        renderer.show(&SessionSummary::new(session, catalog))?;
    }
    renderer.show(&OperationStatus::success("Session saved"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!(Key::parse("d"), Some(Key::Done));
        assert_eq!(Key::parse(" Skip \n"), Some(Key::Skip));
        assert_eq!(Key::parse("B"), Some(Key::Back));
        assert_eq!(Key::parse("timer"), Some(Key::Timer));
        assert_eq!(Key::parse("q"), Some(Key::Quit));
        assert_eq!(Key::parse("?"), Some(Key::Help));
        assert_eq!(Key::parse(""), None);
        assert_eq!(Key::parse("x"), None);
    }
}
