use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{RecommenderError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub tags: String,
}

/// Interaction record. Loaded and counted, never scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: i64,
    pub item_id: i64,
    pub score: f64,
}

#[derive(Debug, Default, Clone)]
pub struct Catalog {
    pub items: Vec<Item>,
    pub ratings: Vec<Rating>,
}

impl Catalog {
    pub fn load(items_path: &Path, ratings_path: Option<&Path>) -> Result<Self> {
        let items = load_items(items_path)?;
        let ratings = match ratings_path {
            Some(path) => load_ratings(path)?,
            None => Vec::new(),
        };
        Ok(Catalog { items, ratings })
    }
}

#[derive(Deserialize)]
struct ItemRow {
    #[serde(alias = "movieId")]
    id: i64,
    title: String,
    #[serde(alias = "genres")]
    tags: String,
}

#[derive(Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: i64,
    #[serde(rename = "itemId", alias = "movieId")]
    item_id: i64,
    #[serde(alias = "rating")]
    score: f64,
}

const ITEM_COLUMNS: &[&[&str]] = &[&["id", "movieId"], &["title"], &["tags", "genres"]];
const RATING_COLUMNS: &[&[&str]] = &[&["userId"], &["itemId", "movieId"], &["score", "rating"]];

pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let items = read_items(open(path)?)?;
    info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

pub fn load_ratings(path: &Path) -> Result<Vec<Rating>> {
    let ratings = read_ratings(open(path)?)?;
    info!("Loaded {} ratings from {}", ratings.len(), path.display());
    Ok(ratings)
}

/// Parses an items table. Rows with an empty title or empty tags are
/// rejected with their line number.
pub fn read_items<R: Read>(source: R) -> Result<Vec<Item>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let headers = check_headers(&mut reader, ITEM_COLUMNS)?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|p| p.line());
        let row: ItemRow = deserialize_row(&record, &headers)?;

        if row.title.is_empty() {
            return Err(RecommenderError::data_format(line, "empty title"));
        }
        if row.tags.is_empty() {
            return Err(RecommenderError::data_format(line, "empty tags"));
        }

        items.push(Item {
            id: row.id,
            title: row.title,
            tags: row.tags,
        });
    }

    Ok(items)
}

pub fn read_ratings<R: Read>(source: R) -> Result<Vec<Rating>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let headers = check_headers(&mut reader, RATING_COLUMNS)?;

    let mut ratings = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row: RatingRow = deserialize_row(&record, &headers)?;
        ratings.push(Rating {
            user_id: row.user_id,
            item_id: row.item_id,
            score: row.score,
        });
    }

    Ok(ratings)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| RecommenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn check_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    required: &[&[&str]],
) -> Result<StringRecord> {
    let headers = reader.headers().map_err(csv_error)?.clone();

    for names in required {
        if !headers.iter().any(|h| names.contains(&h)) {
            return Err(RecommenderError::MissingColumn {
                column: names[0].to_string(),
                available: headers.iter().map(str::to_string).collect(),
            });
        }
    }

    Ok(headers)
}

fn deserialize_row<'de, T: Deserialize<'de>>(
    record: &'de StringRecord,
    headers: &'de StringRecord,
) -> Result<T> {
    record.deserialize(Some(headers)).map_err(csv_error)
}

fn csv_error(err: csv::Error) -> RecommenderError {
    let line = err.position().map(|p| p.line());
    RecommenderError::data_format(line, err.to_string())
}
