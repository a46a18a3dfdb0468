//! Workbook fixtures, built in memory.
//!
//! [`WorkbookFixture`] writes a single-sheet `.xlsx` with a header row and
//! text records. Cells that parse as numbers are written as numbers, the way
//! a spreadsheet user would have typed them.

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

/// Standard Korean header row.
pub const HEADERS: &[&str] = &["업체명", "상품명", "입고수량", "유통기한", "보관장"];

/// Records matching [`crate::common::sample_rows`], as typed into a sheet.
pub const SAMPLE_RECORDS: &[&[&str]] = &[
    &["행복상사", "서울우유 1L", "12", "2024-05-01", "A-01"],
    &["바른식품", "국산 두부", "30", "45000", "A-02"],
    &["Fresh Farm", "Green Apple", "5", "", "B-10"],
    &["행복상사", "아이스 크림", "", "유통기한 없음", "C-03"],
    &["ACME Corp", "두부 과자", "7", "45292", ""],
];

#[derive(Debug, Clone, Default)]
pub struct WorkbookFixture {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    /// `(row, col, y, m, d)` cells written as date-formatted values.
    dates: Vec<(u32, u16, u16, u8, u8)>,
}

impl WorkbookFixture {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            ..Self::default()
        }
    }

    /// The standard headers with [`SAMPLE_RECORDS`].
    pub fn sample() -> Self {
        SAMPLE_RECORDS
            .iter()
            .fold(Self::new(HEADERS), |fixture, record| fixture.record(record))
    }

    pub fn record(mut self, cells: &[&str]) -> Self {
        self.records.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    /// An entirely empty line between records.
    pub fn blank_record(mut self) -> Self {
        self.records.push(Vec::new());
        self
    }

    /// Overwrite record `index`, column `col`, with a real date cell.
    pub fn date(mut self, index: u32, col: u16, ymd: (u16, u8, u8)) -> Self {
        self.dates.push((index + 1, col, ymd.0, ymd.1, ymd.2));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, header) in self.headers.iter().enumerate() {
            sheet.write_string(0, col as u16, header).unwrap();
        }
        for (i, record) in self.records.iter().enumerate() {
            let row = i as u32 + 1;
            for (col, cell) in record.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(n) => sheet.write_number(row, col as u16, n).unwrap(),
                    Err(_) => sheet.write_string(row, col as u16, cell).unwrap(),
                };
            }
        }

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        for &(row, col, y, m, d) in &self.dates {
            let date = ExcelDateTime::from_ymd(y, m, d).unwrap();
            sheet.write_datetime_with_format(row, col, &date, &date_format).unwrap();
        }

        workbook.save_to_buffer().unwrap()
    }

    /// Write the workbook into `dir` and return its path.
    pub fn write_to(&self, dir: &std::path::Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.to_bytes()).unwrap();
        path
    }
}
