use std::io::{self, Write};

use colored::Colorize;
use crossterm::terminal;

use crate::error::{Error, Result};
use crate::style;
use crate::testing::{Mismatch, Verdict};

const BOLD_LINE: &str = "━";

fn terminal_cols() -> usize {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    cols as usize
}

/// Prints the verdict, or the error that kept the test from being judged, to stdout.
pub fn print_outcome(outcome: &Result<Verdict>) {
    let stdout = io::stdout();
    write_outcome(&mut stdout.lock(), outcome, terminal_cols())
        .unwrap_or_else(|e| log::error!("Failed to write test outcome: {:#}", e));
}

pub fn write_outcome(w: &mut impl Write, outcome: &Result<Verdict>, cols: usize) -> io::Result<()> {
    match outcome {
        Ok(v) => write_verdict(w, v, cols),
        Err(e) => write_error(w, e, cols),
    }
}

/// `Test <id>: passed`, or `Test <id>: failed` followed by the expected/actual blocks.
pub fn write_verdict(w: &mut impl Write, v: &Verdict, cols: usize) -> io::Result<()> {
    write!(w, "Test {}: {}", v.test_id, style::judge_word(v.judge))?;
    if let Some(reason) = v.reason {
        write!(w, " ({})", reason)?;
    }
    writeln!(w)?;

    if let Some(m) = &v.mismatch {
        write_mismatch(w, m, cols)?;
    }
    Ok(())
}

pub fn write_error(w: &mut impl Write, err: &Error, cols: usize) -> io::Result<()> {
    writeln!(w, "{}", err.to_string().bright_red())?;

    if let Error::SubjectFailed { stderr, .. } = err {
        if !stderr.trim().is_empty() {
            let bold_bar = BOLD_LINE.repeat(cols).blue().bold();
            writeln!(w, "{}", bold_bar)?;
            write_sub_title(w, "Stderr:")?;
            write!(w, "{}", stderr)?;
            if !stderr.ends_with('\n') {
                writeln!(w)?;
            }
            writeln!(w, "{}", bold_bar)?;
        }
    }
    Ok(())
}

fn write_mismatch(w: &mut impl Write, m: &Mismatch, cols: usize) -> io::Result<()> {
    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();

    writeln!(w, "{}", bold_bar)?;
    write_sub_title(w, "Expected:")?;
    write_lines(w, &m.expected)?;

    write_sub_title(w, "Programme output:")?;
    write_lines(w, &m.actual)?;

    if !m.stderr.is_empty() {
        write_sub_title(w, "Stderr:")?;
        write!(w, "{}", m.stderr)?;
        if !m.stderr.ends_with('\n') {
            writeln!(w)?;
        }
    }
    writeln!(w, "{}", bold_bar)
}

fn write_sub_title(w: &mut impl Write, s: &str) -> io::Result<()> {
    writeln!(w, "{}", s.cyan().bold())
}

/// Prints `text` line by line, marking what trimming-free eyes would miss.
fn write_lines(w: &mut impl Write, text: &str) -> io::Result<()> {
    let lines: Vec<_> = text.lines().collect();
    if lines.is_empty() {
        return writeln!(w, "{}", "<EMPTY>".magenta().dimmed());
    }

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_end();
        write!(w, "{}", trimmed)?;

        let num_trailing_whitespace = line.len() - trimmed.len();
        if num_trailing_whitespace > 0 && colored::control::SHOULD_COLORIZE.should_colorize() {
            write!(
                w,
                "{}",
                " ".repeat(num_trailing_whitespace).on_red(),
            )?;
        } else {
            write!(w, "{}", &line[trimmed.len()..])?;
        }

        let is_last_line = i + 1 == lines.len();
        if is_last_line && !text.ends_with('\n') {
            write!(w, "{}", " Missing new line ".on_yellow().black().bold())?;
        }

        writeln!(w)?;
    }
    Ok(())
}
