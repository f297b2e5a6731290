//! `wifispot upload`: predict every row of a CSV file.

use std::path::Path;

use wifispot_core::{AcquisitionMode, ObservationTable};

/// Rows shown before predicting.
const PREVIEW_ROWS: usize = 5;

pub async fn run(
    config_path: &Path,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = super::load_pipeline(config_path)?;
    let to_stdout = output.as_os_str() == "-";

    let file = std::fs::File::open(input)
        .map_err(|e| format!("Failed to open {}: {e}", input.display()))?;
    let table = pipeline.read_upload(std::io::BufReader::new(file))?;

    eprintln!("📄 {} ({} rows)", input.display(), table.row_count());
    eprint!("{}", preview(&table, PREVIEW_ROWS));

    let batch = pipeline
        .run(AcquisitionMode::Upload(table))?
        .into_batch()
        .ok_or("upload mode did not produce a batch")?;

    if to_stdout {
        print!("{}", batch.csv);
    } else {
        std::fs::write(output, &batch.csv)?;
        eprintln!(
            "✅ Predicted {} rows, written to {}",
            batch.table.row_count(),
            output.display()
        );
    }

    Ok(())
}

/// First `limit` rows as aligned text.
fn preview(table: &ObservationTable, limit: usize) -> String {
    let mut out = String::new();
    out.push_str("   ");
    out.push_str(&table.columns().join("\t"));
    out.push('\n');
    for row in table.rows().iter().take(limit) {
        let cells: Vec<String> = row.iter().map(|v| format!("{v}")).collect();
        out.push_str("   ");
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    if table.row_count() > limit {
        out.push_str(&format!("   ... {} more\n", table.row_count() - limit));
    }
    out
}
