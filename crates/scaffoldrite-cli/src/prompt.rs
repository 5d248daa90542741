//! Yes/no confirmation prompts.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::CliResult;

/// Ask `prompt`, defaulting to yes.
///
/// `assume_yes` (the `-y` flag) skips the question. Uses a dialoguer prompt
/// on an interactive terminal and a plain stdin read otherwise; end of
/// input counts as no.
pub fn confirm(prompt: &str, assume_yes: bool) -> CliResult<bool> {
    if assume_yes {
        return Ok(true);
    }

    #[cfg(feature = "interactive")]
    if io::stdin().is_terminal() && io::stderr().is_terminal() {
        return dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(|e| io::Error::other(e.to_string()).into());
    }

    let mut stderr = io::stderr();
    write!(stderr, "{prompt} [Y/n] ")?;
    stderr.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(parse_answer(&line))
}

fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "" | "y" | "yes")
}
