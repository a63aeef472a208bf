//! 🎼 Composers — turning a [`Dataset`] into the bytes the bucket will keep forever.
//!
//! *[the table is ready. the writer awaits. somewhere, a comma clears its throat.]*
//!
//! 🧠 Knowledge graph:
//! - `CsvComposer`: header row + one record per row, `\n` terminated, minimal quoting.
//! - Quoting/escaping is the `csv` crate's job. We do not hand-roll RFC 4180 at 3am.
//! - Cell text comes from `CellValue::render`, so the preview and the file agree on reality.
//!
//! 📜 "He who joins fields with `,` by hand, meets the city of 'Washington, D.C.' in production."

use crate::dataset::Dataset;

/// 📄 Renders datasets as comma-separated text with a header row.
#[derive(Debug, Clone, Copy)]
pub struct CsvComposer {
    delimiter: u8,
}

impl Default for CsvComposer {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvComposer {
    /// 🎼 Compose the whole dataset into one in-memory payload.
    ///
    /// N rows × M columns becomes N+1 lines of M fields. Fields holding the
    /// delimiter, a quote, or a line break are quoted, embedded quotes doubled.
    pub fn compose(&self, dataset: &Dataset) -> Result<Vec<u8>, csv::Error> {
        // 🧮 vibes-based pre-allocation: ~12 bytes per cell, plus the header
        let estimated_size = (dataset.num_rows() + 1) * dataset.num_columns() * 12;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::with_capacity(estimated_size));

        writer.write_record(dataset.columns())?;
        for row in dataset.rows() {
            writer.write_record(row.iter().map(|cell| cell.render().into_owned()))?;
        }

        // -- 🚿 into_inner flushes. if the flush fails into a Vec, the universe has bigger issues.
        writer
            .into_inner()
            .map_err(|flush_failure| csv::Error::from(flush_failure.into_error()))
    }
}

/// 🎯 Shortcut for the default composer.
pub fn render_csv(dataset: &Dataset) -> Result<Vec<u8>, csv::Error> {
    CsvComposer::default().compose(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;

    fn compose_to_string(dataset: &Dataset) -> String {
        String::from_utf8(render_csv(dataset).expect("💀 composing into a Vec should not fail"))
            .expect("💀 CSV output should be UTF-8, we only wrote UTF-8 into it")
    }

    #[test]
    fn the_one_where_the_sample_becomes_exactly_the_csv_we_promised() {
        let csv_text = compose_to_string(&Dataset::sample());
        assert_eq!(
            csv_text,
            "id,name,city,score,active,registered\n\
             1001,Rajan,Chennai,89.5,True,2025-01-15\n\
             1002,Priya,Coimbatore,92.0,True,2025-02-03\n\
             1003,Arjun,Madurai,78.5,False,2024-11-20\n\
             1004,Meera,Salem,95.0,True,2025-03-10\n"
        );
    }

    #[test]
    fn the_one_where_n_rows_make_n_plus_one_lines_of_m_fields() {
        let dataset = Dataset::sample();
        let csv_text = compose_to_string(&dataset);
        let lines: Vec<&str> = csv_text.lines().collect();

        assert_eq!(lines.len(), dataset.num_rows() + 1);
        for line in lines {
            assert_eq!(line.split(',').count(), dataset.num_columns());
        }
    }

    #[test]
    fn the_one_where_commas_and_quotes_get_wrapped_up_safely() {
        let dataset = Dataset::from_rows(
            ["city", "quote"],
            vec![vec![
                CellValue::from("Washington, D.C."),
                CellValue::from(r#"she said "hi""#),
            ]],
        )
        .expect("💀 a two-column table should build");
        let csv_text = compose_to_string(&dataset);

        assert_eq!(
            csv_text,
            "city,quote\n\"Washington, D.C.\",\"she said \"\"hi\"\"\"\n"
        );

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_text.as_bytes());
        for record in reader.records() {
            let record = record.expect("💀 our own output should parse");
            assert_eq!(record.len(), dataset.num_columns());
        }
    }

    #[test]
    fn the_one_where_reading_it_back_gives_us_the_same_table_as_strings() {
        let dataset = Dataset::from_columns([
            ("id", vec![CellValue::from(1), CellValue::from(2), CellValue::from(3)]),
            (
                "note",
                vec![
                    CellValue::from("plain"),
                    CellValue::from("multi\nline"),
                    CellValue::from("comma, inside"),
                ],
            ),
            (
                "score",
                vec![CellValue::from(1.5), CellValue::from(-0.25), CellValue::from(3.0)],
            ),
            (
                "active",
                vec![CellValue::from(true), CellValue::from(false), CellValue::from(true)],
            ),
        ])
        .expect("💀 four equal columns should build");
        let csv_bytes = render_csv(&dataset).expect("💀 composing into a Vec should not fail");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_bytes.as_slice());
        let headers: Vec<String> = reader
            .headers()
            .expect("💀 header row should be there")
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, dataset.columns());

        let parsed_rows: Vec<Vec<String>> = reader
            .records()
            .map(|record| {
                record
                    .expect("💀 every record should parse")
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        let expected_rows: Vec<Vec<String>> = dataset
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.render().into_owned()).collect())
            .collect();
        assert_eq!(parsed_rows, expected_rows);
    }

    #[test]
    fn the_one_where_an_empty_table_is_just_a_header() {
        let dataset = Dataset::from_rows(["only", "header"], vec![])
            .expect("💀 zero rows is still a valid table");
        assert_eq!(compose_to_string(&dataset), "only,header\n");
    }
}
