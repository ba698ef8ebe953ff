use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub name: String,
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProficiencyBand {
    pub name: String,
    pub threshold: f64,
}

/// One chart record: a skill, its own level, and every band threshold
/// broadcast into the row. `band_levels` is index-aligned with the
/// dataset's `band_names`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub skill: String,
    pub level: f64,
    pub band_levels: Vec<f64>,
}

/// Rows sorted ascending by level, with the first row repeated at the end
/// so each plotted trace forms a closed loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub band_names: Vec<String>,
    pub rows: Vec<ChartRow>,
}

impl ChartDataset {
    /// Number of distinct skills, excluding the closure row.
    pub fn skill_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Largest value across skill levels and band thresholds, for the
    /// radial scale.
    pub fn max_radius(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| std::iter::once(row.level).chain(row.band_levels.iter().copied()))
            .fold(0.0_f64, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    None,
    ToNext,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StyleError {
    #[error("opacity must be within 0.0..=1.0, got {0}")]
    OpacityOutOfRange(f64),
    #[error("line width must be positive, got {0}")]
    NonPositiveLineWidth(f64),
}

/// Draw style for one trace. Validated at construction; fields stay
/// private so an invalid style cannot be assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStyle {
    fill: FillMode,
    opacity: f64,
    line_width: f64,
}

impl TraceStyle {
    pub fn new(fill: FillMode, opacity: f64, line_width: f64) -> Result<Self, StyleError> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(StyleError::OpacityOutOfRange(opacity));
        }
        if line_width <= 0.0 {
            return Err(StyleError::NonPositiveLineWidth(line_width));
        }
        Ok(Self {
            fill,
            opacity,
            line_width,
        })
    }

    /// Band ring style: translucent fill between rings, thin outline.
    pub fn band_default() -> Self {
        Self {
            fill: FillMode::ToNext,
            opacity: 0.5,
            line_width: 1.0,
        }
    }

    /// Skill trace style: no fill, full opacity, heavy line.
    pub fn skill_default() -> Self {
        Self {
            fill: FillMode::None,
            opacity: 1.0,
            line_width: 4.0,
        }
    }

    pub fn fill(&self) -> FillMode {
        self.fill
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_style_accepts_valid_options() {
        let style = TraceStyle::new(FillMode::ToNext, 0.5, 1.0).unwrap();
        assert_eq!(style.fill(), FillMode::ToNext);
        assert_eq!(style.opacity(), 0.5);
        assert_eq!(style.line_width(), 1.0);
    }

    #[test]
    fn trace_style_rejects_out_of_range_opacity() {
        assert_eq!(
            TraceStyle::new(FillMode::None, 1.5, 1.0),
            Err(StyleError::OpacityOutOfRange(1.5))
        );
        assert_eq!(
            TraceStyle::new(FillMode::None, -0.1, 1.0),
            Err(StyleError::OpacityOutOfRange(-0.1))
        );
    }

    #[test]
    fn trace_style_rejects_non_positive_line_width() {
        assert_eq!(
            TraceStyle::new(FillMode::None, 1.0, 0.0),
            Err(StyleError::NonPositiveLineWidth(0.0))
        );
    }

    #[test]
    fn max_radius_covers_levels_and_thresholds() {
        let dataset = ChartDataset {
            band_names: vec!["Advanced".to_string()],
            rows: vec![
                ChartRow {
                    skill: "A".to_string(),
                    level: 3.0,
                    band_levels: vec![10.0],
                },
                ChartRow {
                    skill: "A".to_string(),
                    level: 3.0,
                    band_levels: vec![10.0],
                },
            ],
        };
        assert_eq!(dataset.max_radius(), 10.0);
        assert_eq!(dataset.skill_count(), 1);
    }
}
