//! Loads the stop catalog from the `stops.txt` table of a GTFS zip.

use serde::Deserialize;
use std::{
    fs::File,
    io::{self},
    path::PathBuf,
};
use thiserror::Error;
use tracing::{info, warn};
use zip::{ZipArchive, read::ZipFile};

mod config;
pub use config::*;

use crate::model::Stop;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
}

#[derive(Deserialize, Debug, Clone)]
struct GtfsStop {
    stop_id: String,
    #[serde(default)]
    stop_name: String,
    stop_lat: Option<f64>,
    stop_lon: Option<f64>,
}

impl GtfsStop {
    fn into_stop(self) -> Option<Stop> {
        let id: u64 = self.stop_id.trim().parse().ok()?;
        Some(Stop::new(id, self.stop_name, self.stop_lat?, self.stop_lon?))
    }
}

pub struct Feed {
    config: Config,
    path: PathBuf,
}

impl Feed {
    pub fn new(config: self::Config, path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            path: path.into(),
        }
    }

    pub fn from_zip(path: impl Into<PathBuf>) -> Self {
        Self::new(Config::default(), path)
    }

    /// Reads every usable stop. Rows with a non numeric id or without
    /// coordinates are skipped.
    pub fn stops(&self) -> Result<Vec<Stop>, self::Error> {
        let zip_file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(zip_file)?;
        let file = get_file(&mut archive, &self.config.stops_file_name)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut stops = Vec::new();
        let mut skipped = 0usize;
        for row in reader.deserialize::<GtfsStop>() {
            let row = row?;
            let stop_id = row.stop_id.clone();
            match row.into_stop() {
                Some(stop) => stops.push(stop),
                None => {
                    skipped += 1;
                    warn!("Skipping stop {stop_id}");
                }
            }
        }
        info!(
            "Loaded {} stops from {} ({skipped} skipped)",
            stops.len(),
            self.path.display()
        );
        Ok(stops)
    }
}

fn get_file<'a>(
    archive: &'a mut ZipArchive<File>,
    name: &'a str,
) -> Result<ZipFile<'a, File>, self::Error> {
    let index = archive
        .index_for_name(name)
        .ok_or(self::Error::FileNotFound(name.to_string()))?;
    let file = archive.by_index(index)?;
    Ok(file)
}
