//! CSV export of the filtered viewer rows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;

use crate::filter::Filterable;
use crate::model::{Bom, Item};

const BOM_HEADER: [&str; 4] = ["Id", "Name", "Output Item Id", "Items"];

/// `<dir>/<kind>-<timestamp>.csv`
#[must_use]
pub fn export_path(dir: &Path, kind: &str) -> PathBuf {
    dir.join(format!("{kind}-{}.csv", Local::now().format("%Y%m%d-%H%M%S")))
}

pub fn write_items<W: io::Write>(writer: W, items: &[Item]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(Item::COLUMNS)?;
    for item in items {
        csv.write_record((0..Item::COLUMNS.len()).map(|column| item.column_text(column)))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `boms` with component quantities scaled by `count`. `unit_of` gives
/// the unit of an item id.
pub fn write_boms<W: io::Write>(
    writer: W,
    boms: &[Bom],
    count: u32,
    unit_of: impl Fn(&str) -> String,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(BOM_HEADER)?;
    for bom in boms {
        let components: String = bom
            .items
            .iter()
            .map(|reference| {
                format!(
                    "{}:\t{} {}\n",
                    reference.id,
                    reference.quantity * count as f32,
                    unit_of(&reference.id)
                )
            })
            .collect();
        csv.write_record([
            bom.id.as_str(),
            bom.name.as_str(),
            bom.output.id.as_str(),
            components.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

fn create(dir: &Path, kind: &str) -> Result<(PathBuf, fs::File)> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = export_path(dir, kind);
    let file = fs::File::create(&path)
        .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    Ok((path, file))
}

pub fn export_items(dir: &Path, items: &[Item]) -> Result<PathBuf> {
    let (path, file) = create(dir, "items")?;
    write_items(file, items)?;
    tracing::info!("Exported {} items to {}", items.len(), path.display());
    Ok(path)
}

pub fn export_boms(
    dir: &Path,
    boms: &[Bom],
    count: u32,
    unit_of: impl Fn(&str) -> String,
) -> Result<PathBuf> {
    let (path, file) = create(dir, "boms")?;
    write_boms(file, boms, count, unit_of)?;
    tracing::info!("Exported {} BOMs to {}", boms.len(), path.display());
    Ok(path)
}
