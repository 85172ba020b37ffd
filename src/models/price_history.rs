// Price history data models
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub price: f64,
}

/// Chart window selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Earliest date still inside the window, or `None` for `All`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::Week => Some(now - Duration::days(7)),
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::Quarter => Some(now - Duration::days(90)),
            TimeRange::Year => now.checked_sub_months(Months::new(12)),
            TimeRange::All => None,
        }
    }

    /// Points dated at or after the cutoff, order preserved.
    pub fn window(&self, points: &[PricePoint], now: DateTime<Utc>) -> Vec<PricePoint> {
        match self.cutoff(now) {
            Some(cutoff) => points.iter().filter(|p| p.date >= cutoff).cloned().collect(),
            None => points.to_vec(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
            TimeRange::Year => "1y",
            TimeRange::All => "all",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(TimeRange::Week),
            "30d" => Ok(TimeRange::Month),
            "90d" => Ok(TimeRange::Quarter),
            "1y" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            other => Err(format!("Unknown time range: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(days_ago: i64, now: DateTime<Utc>) -> PricePoint {
        PricePoint {
            date: now - Duration::days(days_ago),
            price: days_ago as f64,
        }
    }

    #[test]
    fn test_window_filters_by_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let points: Vec<PricePoint> = [200, 60, 20, 7, 1].iter().map(|d| point(*d, now)).collect();

        let week: Vec<f64> = TimeRange::Week.window(&points, now).iter().map(|p| p.price).collect();
        assert_eq!(week, vec![7.0, 1.0]);

        assert_eq!(TimeRange::Month.window(&points, now).len(), 3);
        assert_eq!(TimeRange::Quarter.window(&points, now).len(), 4);
        assert_eq!(TimeRange::Year.window(&points, now).len(), 5);
        assert_eq!(TimeRange::All.window(&points, now).len(), 5);
    }

    #[test]
    fn test_parse_time_range() {
        assert_eq!("90D".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
        assert_eq!("all".parse::<TimeRange>().unwrap(), TimeRange::All);
        assert!("2w".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::default(), TimeRange::Month);
    }
}
