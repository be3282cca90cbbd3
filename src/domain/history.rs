// Player history domain models and chart axis computation
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 3_600_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySample {
    pub timestamp_ms: i64,
    pub player_count: u32,
}

impl HistorySample {
    pub fn new(timestamp_ms: i64, player_count: u32) -> Self {
        Self {
            timestamp_ms,
            player_count,
        }
    }
}

/// Player-count samples in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub samples: Vec<HistorySample>,
}

impl HistorySeries {
    pub fn new(samples: Vec<HistorySample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copy of the series ordered by timestamp. Equal timestamps keep their
    /// original relative order.
    pub fn sort_ascending(&self) -> HistorySeries {
        let mut samples = self.samples.clone();
        samples.sort_by_key(|s| s.timestamp_ms);
        HistorySeries { samples }
    }

    fn count_bounds(&self) -> Option<(u32, u32)> {
        let min = self.samples.iter().map(|s| s.player_count).min()?;
        let max = self.samples.iter().map(|s| s.player_count).max()?;
        Some((min, max))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::OneHour,
        TimeWindow::SixHours,
        TimeWindow::OneDay,
        TimeWindow::SevenDays,
        TimeWindow::ThirtyDays,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::OneHour => "1h",
            TimeWindow::SixHours => "6h",
            TimeWindow::OneDay => "24h",
            TimeWindow::SevenDays => "7d",
            TimeWindow::ThirtyDays => "30d",
        }
    }

    pub fn hours(self) -> i64 {
        match self {
            TimeWindow::OneHour => 1,
            TimeWindow::SixHours => 6,
            TimeWindow::OneDay => 24,
            TimeWindow::SevenDays => 168,
            TimeWindow::ThirtyDays => 720,
        }
    }

    pub fn range_ending_at(self, end: DateTime<Utc>) -> TimeRange {
        let end_ms = end.timestamp_millis();
        TimeRange {
            start_ms: end_ms - self.hours() * MILLIS_PER_HOUR,
            end_ms,
        }
    }

    /// Window ending now.
    pub fn select(self) -> TimeRange {
        self.range_ending_at(Utc::now())
    }

    pub fn label_count(self) -> usize {
        match self {
            TimeWindow::OneDay => 8,
            TimeWindow::SevenDays => 7,
            TimeWindow::OneHour | TimeWindow::SixHours | TimeWindow::ThirtyDays => 6,
        }
    }

    pub fn label_format(self) -> LabelFormat {
        match self {
            TimeWindow::OneHour | TimeWindow::SixHours | TimeWindow::OneDay => {
                LabelFormat::HourMinute
            }
            TimeWindow::SevenDays | TimeWindow::ThirtyDays => LabelFormat::MonthDay,
        }
    }
}

/// Time range for a window label such as `"24h"`, ending now.
pub fn select_window(label: &str) -> Option<TimeRange> {
    TimeWindow::from_label(label).map(TimeWindow::select)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelFormat {
    HourMinute,
    MonthDay,
}

impl LabelFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            LabelFormat::HourMinute => "%H:%M",
            LabelFormat::MonthDay => "%m-%d",
        }
    }

    /// Render a UTC millisecond timestamp as an axis label.
    pub fn format(self, timestamp_ms: i64) -> String {
        DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
            .map(|t| t.format(self.pattern()).to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YAxis {
    pub min_y: f64,
    pub max_y: f64,
    pub interval: f64,
}

pub fn compute_y_axis(series: &HistorySeries) -> YAxis {
    let Some((min, max)) = series.count_bounds() else {
        return YAxis {
            min_y: 0.0,
            max_y: 10.0,
            interval: 2.0,
        };
    };

    let min = f64::from(min);
    let max = f64::from(max);
    let range = max - min;

    if range == 0.0 {
        YAxis {
            min_y: (min - 5.0).max(0.0),
            max_y: min + 10.0,
            interval: 2.0,
        }
    } else if range < 10.0 {
        YAxis {
            min_y: (min - 2.0).max(0.0),
            max_y: max + 2.0,
            interval: 1.0,
        }
    } else {
        let padding = range * 0.1;
        YAxis {
            min_y: (min - padding).max(0.0),
            max_y: max + padding,
            interval: range / 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XAxis {
    pub label_count: usize,
    pub label_format: LabelFormat,
    /// Samples between two rendered labels.
    pub label_interval: usize,
}

pub fn compute_x_axis(series: &HistorySeries, window: TimeWindow) -> XAxis {
    let label_count = window.label_count();
    let sample_count = series.len();

    let label_interval = if sample_count > label_count {
        (sample_count / (label_count - 1)).max(1)
    } else {
        1
    };

    XAxis {
        label_count,
        label_format: window.label_format(),
        label_interval,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfiguration {
    pub min_y: f64,
    pub max_y: f64,
    pub y_interval: f64,
    pub x_label_count: usize,
    pub x_label_interval: usize,
    pub time_label_format: LabelFormat,
}

impl ChartConfiguration {
    pub fn compute(series: &HistorySeries, window: TimeWindow) -> Self {
        let y = compute_y_axis(series);
        let x = compute_x_axis(series, window);

        Self {
            min_y: y.min_y,
            max_y: y.max_y,
            y_interval: y.interval,
            x_label_count: x.label_count,
            x_label_interval: x.label_interval,
            time_label_format: x.label_format,
        }
    }

    /// Indices of the samples that carry an X axis label.
    pub fn label_indices(&self, sample_count: usize) -> Vec<usize> {
        if sample_count <= self.x_label_count {
            return (0..sample_count).collect();
        }
        (0..sample_count)
            .step_by(self.x_label_interval.max(1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn series(counts: &[u32]) -> HistorySeries {
        HistorySeries::new(
            counts
                .iter()
                .enumerate()
                .map(|(i, c)| HistorySample::new(i as i64 * 60_000, *c))
                .collect(),
        )
    }

    #[test]
    fn test_window_labels() {
        for window in TimeWindow::ALL {
            assert_eq!(TimeWindow::from_label(window.label()), Some(window));
        }
        assert_eq!(TimeWindow::from_label("2h"), None);
        assert_eq!(TimeWindow::ThirtyDays.hours(), 720);
    }

    #[test]
    fn test_select_window_by_label() {
        let range = select_window("6h").unwrap();
        assert_eq!(range.end_ms - range.start_ms, 6 * 3_600_000);
        assert!(select_window("90m").is_none());
    }

    #[test]
    fn test_range_ending_at() {
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let range = TimeWindow::SevenDays.range_ending_at(end);
        assert_eq!(range.end_ms, end.timestamp_millis());
        assert_eq!(range.end_ms - range.start_ms, 168 * 3_600_000);
    }

    #[test]
    fn test_sort_ascending_keeps_input() {
        let input = HistorySeries::new(vec![
            HistorySample::new(300, 5),
            HistorySample::new(100, 2),
            HistorySample::new(200, 8),
        ]);
        let sorted = input.sort_ascending();

        assert_eq!(
            sorted.samples,
            vec![
                HistorySample::new(100, 2),
                HistorySample::new(200, 8),
                HistorySample::new(300, 5),
            ]
        );
        assert_eq!(input.samples[0], HistorySample::new(300, 5));
    }

    #[test]
    fn test_sort_is_stable_for_duplicate_timestamps() {
        let input = HistorySeries::new(vec![
            HistorySample::new(200, 1),
            HistorySample::new(100, 7),
            HistorySample::new(200, 2),
        ]);
        let sorted = input.sort_ascending();
        assert_eq!(sorted.samples[1], HistorySample::new(200, 1));
        assert_eq!(sorted.samples[2], HistorySample::new(200, 2));
    }

    #[test]
    fn test_y_axis_flat_series() {
        let axis = compute_y_axis(&series(&[2, 2, 2]));
        assert_eq!(axis, YAxis { min_y: 0.0, max_y: 12.0, interval: 2.0 });

        let axis = compute_y_axis(&series(&[40]));
        assert_eq!(axis, YAxis { min_y: 35.0, max_y: 50.0, interval: 2.0 });
    }

    #[test]
    fn test_y_axis_narrow_range() {
        let axis = compute_y_axis(&series(&[10, 15]));
        assert_eq!(axis, YAxis { min_y: 8.0, max_y: 17.0, interval: 1.0 });
    }

    #[test]
    fn test_y_axis_wide_range() {
        let axis = compute_y_axis(&series(&[0, 50, 100]));
        assert_eq!(axis.min_y, 0.0);
        assert!((axis.max_y - 110.0).abs() < 1e-9);
        assert!((axis.interval - 20.0).abs() < 1e-9);

        let axis = compute_y_axis(&series(&[100, 200]));
        assert!((axis.min_y - 90.0).abs() < 1e-9);
        assert!((axis.max_y - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_x_axis_per_window() {
        let many = series(&[1; 50]);

        let x = compute_x_axis(&many, TimeWindow::OneDay);
        assert_eq!(x.label_count, 8);
        assert_eq!(x.label_format, LabelFormat::HourMinute);
        assert_eq!(x.label_interval, 50 / 7);

        let x = compute_x_axis(&many, TimeWindow::SevenDays);
        assert_eq!(x.label_count, 7);
        assert_eq!(x.label_format, LabelFormat::MonthDay);
        assert_eq!(x.label_interval, 50 / 6);

        let x = compute_x_axis(&many, TimeWindow::OneHour);
        assert_eq!(x.label_count, 6);
        assert_eq!(x.label_interval, 10);
    }

    #[test]
    fn test_x_axis_few_samples() {
        let x = compute_x_axis(&series(&[1, 2, 3]), TimeWindow::ThirtyDays);
        assert_eq!(x.label_interval, 1);

        let x = compute_x_axis(&series(&[5]), TimeWindow::OneHour);
        assert_eq!(x.label_interval, 1);
    }

    #[test]
    fn test_chart_configuration_label_indices() {
        let config = ChartConfiguration::compute(&series(&[1; 12]), TimeWindow::OneHour);
        assert_eq!(config.x_label_interval, 2);
        assert_eq!(config.label_indices(12), vec![0, 2, 4, 6, 8, 10]);

        let config = ChartConfiguration::compute(&series(&[1; 4]), TimeWindow::OneHour);
        assert_eq!(config.label_indices(4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_label_indices_with_zero_interval() {
        let config = ChartConfiguration {
            min_y: 0.0,
            max_y: 10.0,
            y_interval: 2.0,
            x_label_count: 2,
            x_label_interval: 0,
            time_label_format: LabelFormat::HourMinute,
        };
        assert_eq!(config.label_indices(4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_series_still_configures() {
        let config = ChartConfiguration::compute(&HistorySeries::default(), TimeWindow::SixHours);
        assert_eq!(config.min_y, 0.0);
        assert_eq!(config.max_y, 10.0);
        assert_eq!(config.x_label_interval, 1);
    }

    #[test]
    fn test_label_format() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap().timestamp_millis();
        assert_eq!(LabelFormat::HourMinute.format(ts), "07:05");
        assert_eq!(LabelFormat::MonthDay.format(ts), "03-09");
    }
}
