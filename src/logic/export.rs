//! CSV export of the score table: one row per round plus a totals row.

use crate::logic::ranking::total_scores;
use crate::models::ScoreSheet;
use std::io::Write;

/// Write `sheet` as CSV: `Round,<names>`, one row per round (absent cells blank), then `Total`.
pub fn write_csv<W: Write>(sheet: &ScoreSheet, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Round".to_string()];
    header.extend(sheet.players.iter().map(|p| p.name.clone()));
    wtr.write_record(&header)?;

    for round in &sheet.rounds {
        let mut row = vec![round.index.to_string()];
        row.extend(sheet.players.iter().map(|p| {
            round
                .score(p.id)
                .value()
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        wtr.write_record(&row)?;
    }

    let mut totals = vec!["Total".to_string()];
    totals.extend(total_scores(sheet).iter().map(|t| t.total.to_string()));
    wtr.write_record(&totals)?;

    wtr.flush()?;
    Ok(())
}

/// CSV export as a string.
pub fn to_csv_string(sheet: &ScoreSheet) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(sheet, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
