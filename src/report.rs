//! Result rows and the writers that serialize them.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

pub const CSV_HEADER: &str = "Number of LandA Needed,Number of LandB Needed,CMC,Number Of LandA in Deck,Number of LandB in Deck,Number of LandAB in Deck,Number of Lands In Deck,Number of Cards in Deck,OnCurveProbability";

/// Written in place of a probability when no trial drew enough lands
pub const UNDEFINED: &str = "undefined";

/// One simulated deck configuration
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultRow {
    pub need_a: u32,
    /// 0 for one-color requirements
    pub need_b: u32,
    pub turn: u32,
    pub land_a: u32,
    pub land_b: u32,
    pub land_ab: u32,
    pub total_lands: u32,
    pub total_cards: u32,
    pub probability: Option<f64>,
}

impl ResultRow {
    pub fn to_csv(&self) -> String {
        let probability = match self.probability {
            // Debug keeps the trailing ".0" on whole numbers
            Some(p) => format!("{:?}", p),
            None => UNDEFINED.to_string(),
        };
        format!(
            "{},{},{},{},{},{},{},{},{}",
            self.need_a,
            self.need_b,
            self.turn,
            self.land_a,
            self.land_b,
            self.land_ab,
            self.total_lands,
            self.total_cards,
            probability
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    /// One JSON object per line
    Json,
}

/// Serializes rows to any sink in the chosen format
pub struct RowWriter<W: Write> {
    out: W,
    format: OutputFormat,
    rows: usize,
}

impl<W: Write> RowWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        RowWriter { out, format, rows: 0 }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        match self.format {
            OutputFormat::Csv => writeln!(self.out, "{}", CSV_HEADER),
            OutputFormat::Json => Ok(()),
        }
    }

    pub fn write_row(&mut self, row: &ResultRow) -> io::Result<()> {
        match self.format {
            OutputFormat::Csv => writeln!(self.out, "{}", row.to_csv())?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, row)?;
                writeln!(self.out)?;
            }
        }
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(probability: Option<f64>) -> ResultRow {
        ResultRow {
            need_a: 2,
            need_b: 1,
            turn: 3,
            land_a: 7,
            land_b: 5,
            land_ab: 2,
            total_lands: 17,
            total_cards: 40,
            probability,
        }
    }

    #[test]
    fn test_csv_row_matches_header_width() {
        let line = row(Some(0.75)).to_csv();
        assert_eq!(line, "2,1,3,7,5,2,17,40,0.75");
        assert_eq!(line.split(',').count(), CSV_HEADER.split(',').count());
    }

    #[test]
    fn test_whole_probabilities_keep_decimal_point() {
        assert_eq!(row(Some(1.0)).to_csv(), "2,1,3,7,5,2,17,40,1.0");
        assert_eq!(row(Some(0.0)).to_csv(), "2,1,3,7,5,2,17,40,0.0");
    }

    #[test]
    fn test_undefined_probability() {
        assert_eq!(row(None).to_csv(), "2,1,3,7,5,2,17,40,undefined");
    }

    #[test]
    fn test_csv_writer() {
        let mut writer = RowWriter::new(Vec::new(), OutputFormat::Csv);
        writer.write_header().unwrap();
        writer.write_row(&row(Some(1.0))).unwrap();
        assert_eq!(writer.rows_written(), 1);
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, vec![CSV_HEADER, "2,1,3,7,5,2,17,40,1.0"]);
    }

    #[test]
    fn test_json_writer() {
        let mut writer = RowWriter::new(Vec::new(), OutputFormat::Json);
        writer.write_header().unwrap();
        writer.write_row(&row(None)).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["land_ab"], 2);
        assert!(value["probability"].is_null());
    }
}
