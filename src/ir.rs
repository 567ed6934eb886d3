use serde::{Deserialize, Serialize};

use crate::error::GaugeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MidtermHouse,
    PresidentialYearHouse,
    Presidential,
}

impl Category {
    /// Lookup priority used when a live value matches several categories.
    pub const PRIORITY: [Category; 3] = [
        Category::Presidential,
        Category::PresidentialYearHouse,
        Category::MidtermHouse,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "midterm" | "midterm_house" | "midterm-house" => Some(Self::MidtermHouse),
            "house" | "presidential_year_house" | "presidential-year-house" | "py_house" => {
                Some(Self::PresidentialYearHouse)
            }
            "president" | "presidential" | "pres" => Some(Self::Presidential),
            _ => None,
        }
    }

    pub fn is_house(self) -> bool {
        matches!(self, Self::MidtermHouse | Self::PresidentialYearHouse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub year: i32,
    pub margin: f64,
    pub category: Category,
    /// Forecast or not-yet-decided result.
    #[serde(default)]
    pub projected: bool,
}

impl HistoricalPoint {
    pub fn new(year: i32, margin: f64, category: Category) -> Self {
        Self {
            year,
            margin,
            category,
            projected: false,
        }
    }

    pub fn projected(year: i32, margin: f64, category: Category) -> Self {
        Self {
            projected: true,
            ..Self::new(year, margin, category)
        }
    }

    pub fn is_in_range(&self, bound: f64) -> bool {
        self.margin.abs() <= bound
    }

    /// Two-digit year used in marker labels ("2014" -> "14").
    pub fn short_year(&self) -> String {
        format!("{:02}", self.year.rem_euclid(100))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub points: Vec<HistoricalPoint>,
}

impl Dataset {
    pub fn new(points: Vec<HistoricalPoint>) -> Self {
        Self { points }
    }

    /// Built-in reference results (House popular vote and presidential
    /// popular vote margins, positive = Democratic).
    pub fn sample() -> Self {
        use Category::*;
        let points = vec![
            HistoricalPoint::new(2008, 10.6, PresidentialYearHouse),
            HistoricalPoint::new(2010, -6.8, MidtermHouse),
            HistoricalPoint::new(2012, 1.2, PresidentialYearHouse),
            HistoricalPoint::new(2014, -5.7, MidtermHouse),
            HistoricalPoint::new(2016, 1.1, PresidentialYearHouse),
            HistoricalPoint::new(2018, 8.6, MidtermHouse),
            HistoricalPoint::new(2020, 3.1, PresidentialYearHouse),
            HistoricalPoint::new(2022, -2.8, MidtermHouse),
            HistoricalPoint::new(2024, 0.5, PresidentialYearHouse),
            HistoricalPoint::new(2008, 7.2, Presidential),
            HistoricalPoint::new(2012, 3.9, Presidential),
            HistoricalPoint::new(2016, 2.1, Presidential),
            HistoricalPoint::new(2020, 4.5, Presidential),
            HistoricalPoint::new(2024, -1.5, Presidential),
        ];
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points_in(&self, category: Category) -> impl Iterator<Item = &HistoricalPoint> {
        self.points.iter().filter(move |p| p.category == category)
    }

    pub fn find(&self, year: i32, category: Option<Category>) -> Option<&HistoricalPoint> {
        self.points
            .iter()
            .find(|p| p.year == year && category.is_none_or(|c| c == p.category))
    }

    /// Points outside the dial. These are still rendered; the caller decides
    /// whether to surface the report.
    pub fn validate(&self, bound: f64) -> Vec<GaugeError> {
        self.points
            .iter()
            .filter(|p| !p.margin.is_finite() || !p.is_in_range(bound))
            .map(|p| {
                if p.margin.is_finite() {
                    GaugeError::OutOfRangeData {
                        year: p.year,
                        margin: p.margin,
                        bound,
                    }
                } else {
                    GaugeError::ValueError { value: p.margin }
                }
            })
            .collect()
    }
}
