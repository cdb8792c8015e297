use std::fmt;

use crate::model::WeatherRecord;

pub const COLUMNS: [&str; 5] = ["City", "Temperature", "Humidity", "Weather", "Wind"];

/// Fetched records laid out as rows under the fixed [`COLUMNS`] header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    rows: Vec<WeatherRecord>,
}

impl WeatherTable {
    pub fn from_records(records: Vec<WeatherRecord>) -> Self {
        Self { rows: records }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[WeatherRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cities(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.city.as_str()).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.temperature).collect()
    }

    pub fn humidities(&self) -> Vec<u8> {
        self.rows.iter().map(|r| r.humidity).collect()
    }

    pub fn winds(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.wind).collect()
    }

    /// Number of cities per weather category, most frequent first.
    /// Ties keep the order in which the categories first appear.
    pub fn weather_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for row in &self.rows {
            match counts.iter_mut().find(|(w, _)| *w == row.weather) {
                Some((_, n)) => *n += 1,
                None => counts.push((row.weather.clone(), 1)),
            }
        }
        // stable sort keeps first-appearance order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

impl fmt::Display for WeatherTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "Empty table\nColumns: [{}]", COLUMNS.join(", "));
        }

        let cells: Vec<[String; 6]> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                [
                    i.to_string(),
                    r.city.clone(),
                    format!("{:.2}", r.temperature),
                    r.humidity.to_string(),
                    r.weather.clone(),
                    format!("{:.2}", r.wind),
                ]
            })
            .collect();

        let header = [""].iter().chain(COLUMNS.iter()).copied().collect::<Vec<_>>();
        let widths: Vec<usize> = (0..6)
            .map(|c| {
                cells
                    .iter()
                    .map(|row| row[c].chars().count())
                    .chain(std::iter::once(header[c].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_row(f, &header, &widths)?;
        for row in &cells {
            writeln!(f)?;
            let row: Vec<&str> = row.iter().map(String::as_str).collect();
            write_row(f, &row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[&str], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> =
        row.iter().zip(widths).map(|(cell, w)| format!("{cell:>w$}", w = *w)).collect();
    write!(f, "{}", padded.join("  ").trim_end())
}
