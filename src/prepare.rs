use crate::models::{ChartDataset, ChartRow, ProficiencyBand, SkillScore};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PrepareError {
    #[error("insufficient data: no skills to plot")]
    InsufficientData,
    #[error("no proficiency bands declared")]
    NoBands,
}

/// Builds the dataset behind the radar chart: one row per skill sorted
/// ascending by level, every band threshold broadcast into each row, and
/// the first row appended again at the end.
///
/// The sort is stable, so skills with equal levels keep their input order.
/// That order decides which row is duplicated for polygon closure, so it is
/// part of the contract, not an accident. Levels outside any particular
/// scale pass through unchanged.
pub fn prepare(
    skills: &[SkillScore],
    bands: &[ProficiencyBand],
) -> Result<ChartDataset, PrepareError> {
    if skills.is_empty() {
        return Err(PrepareError::InsufficientData);
    }
    if bands.is_empty() {
        return Err(PrepareError::NoBands);
    }

    let band_levels: Vec<f64> = bands.iter().map(|band| band.threshold).collect();

    let mut rows: Vec<ChartRow> = skills
        .iter()
        .map(|skill| ChartRow {
            skill: skill.name.clone(),
            level: skill.level,
            band_levels: band_levels.clone(),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.level
            .partial_cmp(&b.level)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Close the polygon: the plotted line returns to its starting vertex.
    let closure = rows[0].clone();
    rows.push(closure);

    Ok(ChartDataset {
        band_names: bands.iter().map(|band| band.name.clone()).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, level: f64) -> SkillScore {
        SkillScore {
            name: name.to_string(),
            level,
        }
    }

    fn band(name: &str, threshold: f64) -> ProficiencyBand {
        ProficiencyBand {
            name: name.to_string(),
            threshold,
        }
    }

    #[test]
    fn row_count_is_skill_count_plus_one() {
        let skills = vec![skill("Python", 8.0), skill("SQL", 8.0), skill("R", 5.0)];
        let bands = vec![band("Basic", 4.0), band("Full", 7.5)];

        let dataset = prepare(&skills, &bands).unwrap();
        assert_eq!(dataset.rows.len(), skills.len() + 1);
        assert_eq!(dataset.skill_count(), skills.len());
    }

    #[test]
    fn last_row_duplicates_the_first() {
        let skills = vec![skill("Python", 8.0), skill("R", 5.0)];
        let bands = vec![band("Basic", 4.0)];

        let dataset = prepare(&skills, &bands).unwrap();
        assert_eq!(dataset.rows.first(), dataset.rows.last());
    }

    #[test]
    fn rows_sort_ascending_with_stable_ties() {
        let skills = vec![skill("A", 3.0), skill("B", 1.0), skill("C", 1.0)];
        let bands = vec![band("Low", 2.0)];

        let dataset = prepare(&skills, &bands).unwrap();
        let order: Vec<(&str, f64)> = dataset
            .rows
            .iter()
            .map(|row| (row.skill.as_str(), row.level))
            .collect();
        assert_eq!(
            order,
            vec![("B", 1.0), ("C", 1.0), ("A", 3.0), ("B", 1.0)]
        );
        assert!(dataset.rows.iter().all(|row| row.band_levels == vec![2.0]));
    }

    #[test]
    fn band_columns_are_broadcast_constant() {
        let skills = vec![skill("Python", 8.0), skill("R", 5.0), skill("SQL", 7.0)];
        let bands = vec![band("Basic", 4.0), band("Full", 7.5), band("Advanced", 10.0)];

        let dataset = prepare(&skills, &bands).unwrap();
        assert_eq!(
            dataset.band_names,
            vec!["Basic".to_string(), "Full".to_string(), "Advanced".to_string()]
        );
        for row in &dataset.rows {
            assert_eq!(row.band_levels, vec![4.0, 7.5, 10.0]);
        }
    }

    #[test]
    fn prepare_is_idempotent_across_calls() {
        let skills = vec![skill("Python", 8.0), skill("R", 5.0)];
        let bands = vec![band("Basic", 4.0)];

        let first = prepare(&skills, &bands).unwrap();
        let second = prepare(&skills, &bands).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn single_skill_yields_two_identical_rows() {
        let skills = vec![skill("A", 5.0)];
        let bands = vec![band("Basic", 4.0)];

        let dataset = prepare(&skills, &bands).unwrap();
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[0], dataset.rows[1]);
        assert_eq!(dataset.rows[0].skill, "A");
        assert_eq!(dataset.rows[0].level, 5.0);
        assert_eq!(dataset.rows[0].band_levels, vec![4.0]);
    }

    #[test]
    fn empty_skills_is_an_explicit_error() {
        let bands = vec![band("Basic", 4.0)];
        assert_eq!(prepare(&[], &bands), Err(PrepareError::InsufficientData));
    }

    #[test]
    fn empty_bands_is_an_explicit_error() {
        let skills = vec![skill("A", 5.0)];
        assert_eq!(prepare(&skills, &[]), Err(PrepareError::NoBands));
    }

    #[test]
    fn out_of_range_levels_pass_through() {
        let skills = vec![skill("A", 14.0), skill("B", -2.0)];
        let bands = vec![band("Basic", 4.0)];

        let dataset = prepare(&skills, &bands).unwrap();
        assert_eq!(dataset.rows[0].level, -2.0);
        assert_eq!(dataset.rows[1].level, 14.0);
    }
}
