//! Line-based console used by the interactive collector
//!
//! [`StdConsole`] talks to the terminal; [`ScriptedConsole`] replays canned
//! answers and keeps a transcript, for tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Prompt/read and print, one line at a time
pub trait Console {
    fn print(&mut self, line: &str);

    /// Show `label` and read one line without its line terminator.
    /// `Ok(None)` means end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>>;
}

/// Console over the process's stdin and stdout
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn print(&mut self, line: &str) {
        println!("{}", line);
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", label)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_end(line)))
    }
}

fn strip_line_end(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

/// Console fed from a fixed list of answers
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything printed, and every prompt label followed by its answer
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn print(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        let answer = self.answers.pop_front();
        self.transcript
            .push(format!("{}{}", label, answer.as_deref().unwrap_or_default()));
        Ok(answer)
    }
}

const COLUMN_WIDTH: usize = 25;

/// Lay out items in three padded columns, filled top to bottom.
pub fn columns(items: &[String]) -> Vec<String> {
    let mut cells: Vec<&str> = items.iter().map(String::as_str).collect();
    while cells.len() % 3 != 0 {
        cells.push(" ");
    }

    let rows = cells.len() / 3;
    (0..rows)
        .map(|row| {
            format!(
                "{:<width$} {:<width$} {}",
                cells[row],
                cells[row + rows],
                cells[row + 2 * rows],
                width = COLUMN_WIDTH
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_columns_fill_top_to_bottom() {
        let rows = columns(&items(&["1: a", "2: b", "3: c", "4: d"]));
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("1: a "));
        assert!(rows[0].contains("3: c"));
        assert!(rows[1].starts_with("2: b "));
        assert!(rows[1].contains("4: d"));
        assert_eq!(&rows[0][26..30], "3: c");
    }

    #[test]
    fn test_columns_empty() {
        assert!(columns(&[]).is_empty());
    }

    #[test]
    fn test_scripted_console_replays_and_records() {
        let mut console = ScriptedConsole::new(["3", "x"]);
        console.print("hello");
        assert_eq!(console.prompt("#: ").unwrap().as_deref(), Some("3"));
        assert_eq!(console.remaining(), 1);
        assert_eq!(console.prompt("#: ").unwrap().as_deref(), Some("x"));
        assert_eq!(console.prompt("#: ").unwrap(), None);
        assert_eq!(console.transcript(), ["hello", "#: 3", "#: x", "#: "]);
    }

    #[test]
    fn test_strip_line_end() {
        assert_eq!(strip_line_end("a b \r\n".to_string()), "a b ");
    }
}
