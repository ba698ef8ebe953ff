use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{ChartDataset, ProficiencyBand};

/// First band in declared order whose threshold covers the level. `None`
/// means the level sits above every declared band.
pub fn band_for<'a>(level: f64, bands: &'a [ProficiencyBand]) -> Option<&'a ProficiencyBand> {
    bands.iter().find(|band| level <= band.threshold)
}

pub fn build_summary(
    dataset: &ChartDataset,
    bands: &[ProficiencyBand],
    generated_on: NaiveDate,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Skill Proficiency Summary");
    let _ = writeln!(
        output,
        "Generated {} for {} skills",
        generated_on,
        dataset.skill_count()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Skills (ascending)");

    // Skip the closure row; it exists only for the plot.
    for row in dataset.rows.iter().take(dataset.skill_count()) {
        let classification = match band_for(row.level, bands) {
            Some(band) => band.name.clone(),
            None => match bands.last() {
                Some(top) => format!("beyond {}", top.name),
                None => "unclassified".to_string(),
            },
        };
        let _ = writeln!(
            output,
            "- {} level {:.1} ({})",
            row.skill, row.level, classification
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Proficiency Bands");
    for band in bands {
        let _ = writeln!(output, "- {} up to {:.1}", band.name, band.threshold);
    }

    output
}
