use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::models::{ProficiencyBand, SkillScore};

/// The inputs for one chart: skill scores plus the band thresholds drawn
/// as reference rings. Both are arrays so the declared order survives the
/// round trip; skill order is the tie-break order of the level sort, band
/// order is the ring draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub skills: Vec<SkillScore>,
    pub bands: Vec<ProficiencyBand>,
}

impl Profile {
    fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for skill in &self.skills {
            if !seen.insert(skill.name.as_str()) {
                anyhow::bail!("duplicate skill name: {}", skill.name);
            }
        }
        if self.bands.is_empty() {
            anyhow::bail!("profile declares no proficiency bands");
        }
        Ok(())
    }
}

pub fn load_profile(path: &Path) -> anyhow::Result<Profile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile: {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse profile: {}", path.display()))?;
    profile
        .validate()
        .with_context(|| format!("invalid profile: {}", path.display()))?;
    Ok(profile)
}

pub fn write_profile(profile: &Profile, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(profile).context("failed to serialize profile")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write profile: {}", path.display()))?;
    Ok(())
}

/// Loads skills from a `name,level` CSV and pairs them with the default
/// band set.
pub fn load_csv(path: &Path) -> anyhow::Result<Profile> {
    #[derive(Deserialize)]
    struct CsvRow {
        name: String,
        level: f64,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to read skill csv: {}", path.display()))?;

    let mut skills = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.with_context(|| format!("invalid skill csv: {}", path.display()))?;
        skills.push(SkillScore {
            name: row.name,
            level: row.level,
        });
    }

    let profile = Profile {
        skills,
        bands: default_bands(),
    };
    profile
        .validate()
        .with_context(|| format!("invalid skill csv: {}", path.display()))?;
    Ok(profile)
}

pub fn default_bands() -> Vec<ProficiencyBand> {
    vec![
        ProficiencyBand {
            name: "Basic".to_string(),
            threshold: 4.0,
        },
        ProficiencyBand {
            name: "Full".to_string(),
            threshold: 7.5,
        },
        ProficiencyBand {
            name: "Advanced".to_string(),
            threshold: 10.0,
        },
    ]
}

/// Starter profile written by `init`.
pub fn sample_profile() -> Profile {
    let skills = [
        ("Python", 8.0),
        ("SQL", 8.0),
        ("R", 5.0),
        ("Statistics", 5.0),
        ("MS Office", 7.0),
        ("Leadership", 4.0),
        ("Proactivity", 8.0),
        ("Autonomy", 8.0),
        ("Problem Solving", 7.0),
        ("Strategic Thinking", 6.0),
        ("Predictive Modelling", 7.0),
        ("Time Management", 4.0),
        ("Team Working", 9.0),
        ("Communication", 6.0),
    ];

    Profile {
        skills: skills
            .iter()
            .map(|(name, level)| SkillScore {
                name: name.to_string(),
                level: *level,
            })
            .collect(),
        bands: default_bands(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_profile_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let profile = sample_profile();
        write_profile(&profile, &path).unwrap();
        let loaded = load_profile(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn duplicate_skill_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{
                "skills": [
                    {"name": "Python", "level": 8.0},
                    {"name": "Python", "level": 5.0}
                ],
                "bands": [{"name": "Basic", "threshold": 4.0}]
            }"#,
        )
        .unwrap();

        let err = load_profile(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate skill name: Python"));
    }

    #[test]
    fn empty_band_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"skills": [{"name": "Python", "level": 8.0}], "bands": []}"#,
        )
        .unwrap();

        let err = load_profile(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("no proficiency bands"));
    }

    #[test]
    fn empty_skill_list_loads_cleanly() {
        // Surfaces later from prepare() as the insufficient-data error.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"skills": [], "bands": [{"name": "Basic", "threshold": 4.0}]}"#,
        )
        .unwrap();

        let profile = load_profile(&path).unwrap();
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn csv_skills_pair_with_default_bands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.csv");
        std::fs::write(&path, "name,level\nPython,8\nSQL,7.5\n").unwrap();

        let profile = load_csv(&path).unwrap();
        assert_eq!(
            profile.skills,
            vec![
                SkillScore {
                    name: "Python".to_string(),
                    level: 8.0
                },
                SkillScore {
                    name: "SQL".to_string(),
                    level: 7.5
                },
            ]
        );
        assert_eq!(profile.bands, default_bands());
    }

    #[test]
    fn missing_profile_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_profile(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }
}
