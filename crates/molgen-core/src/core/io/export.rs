use crate::core::models::result::GenerationResult;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct ResultRecord {
    rank: usize,
    composition: String,
    mass: f64,
    deviation: f64,
}

/// Formats a composite as `name:quantity` pairs in unit order, e.g. `C:2 H:6`.
pub fn composition_label(result: &GenerationResult) -> String {
    result
        .composite()
        .named_quantities()
        .map(|(name, quantity)| format!("{name}:{quantity}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes results as CSV with a header row, ranks numbered from 1 in slice order.
pub fn write_results<W: Write>(results: &[GenerationResult], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, result) in results.iter().enumerate() {
        csv_writer.serialize(ResultRecord {
            rank: index + 1,
            composition: composition_label(result),
            mass: result.mass(),
            deviation: result.deviation(),
        })?;
    }
    csv_writer.flush().map_err(|e| ExportError::Csv(e.into()))?;
    Ok(())
}

pub fn write_results_to_path(results: &[GenerationResult], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_results(results, file)
}
