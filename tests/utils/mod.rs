//! Test utilities
//!
//! Builds throwaway dataset directories with postings, macro and cost-of-living
//! files so the stages can run end to end.

use std::fs;
use std::path::{Path, PathBuf};

use jobmarket::PipelineConfig;
use tempfile::TempDir;

pub const POSTINGS_HEADER: &str = "titulo,empresa,pais,ubicacion_raw,modalidad,desc_longitud,url";

/// One scraped posting written as a CSV line
#[derive(Debug, Clone)]
pub struct PostingRow {
    pub title: String,
    pub company: String,
    pub country: String,
    pub location: String,
    pub modality: String,
    pub desc_length: String,
    pub url: String,
}

impl PostingRow {
    pub fn new(country: &str, location: &str, desc_length: &str) -> Self {
        Self {
            title: "Data Analyst".to_string(),
            company: "Acme".to_string(),
            country: country.to_string(),
            location: location.to_string(),
            modality: "Presencial".to_string(),
            desc_length: desc_length.to_string(),
            url: "https://jobs.example.org/1".to_string(),
        }
    }

    fn to_line(&self) -> String {
        [
            &self.title,
            &self.company,
            &self.country,
            &self.location,
            &self.modality,
            &self.desc_length,
            &self.url,
        ]
        .iter()
        .map(|field| {
            if field.contains(',') {
                format!("\"{field}\"")
            } else {
                (*field).clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Postings table text with the full whitelist header
pub fn postings_csv(rows: &[PostingRow]) -> String {
    let mut text = String::from(POSTINGS_HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(&row.to_line());
        text.push('\n');
    }
    text
}

/// Macro source text with one `REF_AREA,OBS_VALUE` row per entry
pub fn macro_csv(rows: &[(&str, &str)]) -> String {
    let mut text = String::from("STRUCTURE,REF_AREA,TIME_PERIOD,OBS_VALUE\n");
    for (code, value) in rows {
        text.push_str(&format!("DF_AV_AN_WAGE,{code},2024,{value}\n"));
    }
    text
}

/// Cost-of-living text, quoted the way hand-exported files are
pub fn cost_of_living_csv(rows: &[(&str, f64, f64)]) -> String {
    let mut text = String::from("\"pais\";\"indice_coste_vida_2024\";\"indice_alquiler_2024\"\n");
    for (country, cost, rent) in rows {
        text.push_str(&format!("\"{country}\";{cost};{rent}\n"));
    }
    text
}

/// A temporary dataset directory and a configuration pointing at it
pub struct DatasetFixture {
    pub dir: TempDir,
    pub config: PipelineConfig,
}

impl DatasetFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = PipelineConfig::default().with_dataset_dir(dir.path());
        Self { dir, config }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file into the dataset directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("write fixture file");
        path
    }

    pub fn with_postings(self, rows: &[PostingRow]) -> Self {
        let name = self.config.postings_file.clone();
        self.write(&name, &postings_csv(rows));
        self
    }

    pub fn with_macro(self, rows: &[(&str, &str)]) -> Self {
        self.write("OECD_AV_AN_WAGE.csv", &macro_csv(rows));
        self
    }

    pub fn with_cost_of_living(self, rows: &[(&str, f64, f64)]) -> Self {
        let name = self.config.cost_of_living_file.clone();
        self.write(&name, &cost_of_living_csv(rows));
        self
    }

    /// Output file text without the byte-order mark
    pub fn read_output(&self, path: &Path) -> String {
        let text = fs::read_to_string(path).expect("read output");
        text.trim_start_matches('\u{feff}').to_string()
    }
}
