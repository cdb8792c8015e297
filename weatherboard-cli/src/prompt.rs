use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

use weatherboard_core::input::{clean_city_names, parse_city_count};

/// Source of answers to interactive questions.
pub trait Prompter {
    fn ask(&mut self, message: &str) -> Result<String>;
}

/// Terminal prompts via `inquire`.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask(&mut self, message: &str) -> Result<String> {
        inquire::Text::new(message).prompt().context("Failed to read answer from terminal")
    }
}

/// Plain line-by-line answers, used when stdin is not a terminal.
#[derive(Debug)]
pub struct LinePrompter<R> {
    reader: R,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Prompter for LinePrompter<R> {
    fn ask(&mut self, message: &str) -> Result<String> {
        print!("{message} ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).context("Failed to read from stdin")?;
        if read == 0 {
            bail!("Unexpected end of input while waiting for: {message}");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Ask for a city count, then that many city names. Blank names are dropped.
pub fn collect_cities(prompter: &mut dyn Prompter) -> Result<Vec<String>> {
    let raw = prompter.ask("Enter number of Cities:")?;
    let count = parse_city_count(&raw)?;

    let mut names = Vec::new();
    for n in 1..=count {
        names.push(prompter.ask(&format!("Enter City {n}:"))?);
    }

    Ok(clean_city_names(names))
}
