//! Per-day overview: best Peak and mean Avg per exercise and hand

use crate::export::{Measure, MeasurementRow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub exercise: String,
    pub hand: String,
    /// Distinct set numbers after renumbering
    pub sets: usize,
    /// Repetitions with an Avg value
    pub reps: usize,
    pub max_peak: Option<f64>,
    pub mean_avg: Option<f64>,
}

#[derive(Default)]
struct Acc {
    sets: BTreeSet<u32>,
    max_peak: Option<f64>,
    avg_sum: f64,
    avg_count: usize,
}

/// Aggregate the table by (date, exercise, hand), sorted on those keys.
pub fn daily(rows: &[MeasurementRow]) -> Vec<DailySummary> {
    let mut groups: BTreeMap<(NaiveDate, &str, &str), Acc> = BTreeMap::new();

    for row in rows {
        let acc = groups
            .entry((row.date, row.exercise.as_str(), row.hand.as_str()))
            .or_default();
        acc.sets.insert(row.set);
        match row.measure {
            Measure::Peak => {
                acc.max_peak = Some(acc.max_peak.map_or(row.value, |m| m.max(row.value)));
            }
            Measure::Avg => {
                acc.avg_sum += row.value;
                acc.avg_count += 1;
            }
        }
    }

    groups
        .into_iter()
        .map(|((date, exercise, hand), acc)| DailySummary {
            date,
            exercise: exercise.to_string(),
            hand: hand.to_string(),
            sets: acc.sets.len(),
            reps: acc.avg_count,
            max_peak: acc.max_peak,
            mean_avg: (acc.avg_count > 0).then(|| acc.avg_sum / acc.avg_count as f64),
        })
        .collect()
}

/// Plain-text table of [`daily`] results.
pub fn write_table<W: Write>(writer: &mut W, summaries: &[DailySummary]) -> io::Result<()> {
    writeln!(
        writer,
        "{:<10}  {:<20}  {:<5}  {:>4}  {:>4}  {:>8}  {:>8}",
        "DATE", "EXERCISE", "HAND", "SETS", "REPS", "MAX PEAK", "MEAN AVG"
    )?;
    writeln!(writer, "{}", "-".repeat(71))?;

    for s in summaries {
        writeln!(
            writer,
            "{:<10}  {:<20}  {:<5}  {:>4}  {:>4}  {:>8}  {:>8}",
            s.date,
            truncate(&s.exercise, 20),
            truncate(&s.hand, 5),
            s.sets,
            s.reps,
            fmt_opt(s.max_peak),
            fmt_opt(s.mean_avg)
        )?;
    }
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn row(ts: &str, exercise: &str, hand: &str, set: u32, measure: Measure, value: f64) -> MeasurementRow {
        let time = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        MeasurementRow {
            date: time.date(),
            time,
            exercise: exercise.to_string(),
            duration_work: "7".to_string(),
            duration_pause: "3".to_string(),
            set,
            hand: hand.to_string(),
            rep: 1,
            measure,
            value,
        }
    }

    // ==========================================================================
    // AGGREGATION
    // ==========================================================================

    #[test]
    fn test_max_peak_and_mean_avg() {
        let rows = vec![
            row("2024-03-15 10:00:00", "Hang", "L", 1, Measure::Avg, 10.0),
            row("2024-03-15 10:00:00", "Hang", "L", 1, Measure::Avg, 14.0),
            row("2024-03-15 10:00:00", "Hang", "L", 1, Measure::Peak, 18.0),
            row("2024-03-15 10:05:00", "Hang", "L", 2, Measure::Peak, 21.5),
        ];
        let out = daily(&rows);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sets, 2);
        assert_eq!(out[0].reps, 2);
        assert_eq!(out[0].max_peak, Some(21.5));
        assert_eq!(out[0].mean_avg, Some(12.0));
    }

    #[test]
    fn test_grouped_by_day_exercise_hand() {
        let rows = vec![
            row("2024-03-16 09:00:00", "Hang", "L", 1, Measure::Avg, 1.0),
            row("2024-03-15 10:00:00", "Hang", "R", 1, Measure::Avg, 2.0),
            row("2024-03-15 10:00:00", "Hang", "L", 1, Measure::Avg, 3.0),
            row("2024-03-15 11:00:00", "Pinch", "L", 1, Measure::Avg, 4.0),
        ];
        let out = daily(&rows);

        let keys: Vec<(String, &str, &str)> = out
            .iter()
            .map(|s| (s.date.to_string(), s.exercise.as_str(), s.hand.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-03-15".to_string(), "Hang", "L"),
                ("2024-03-15".to_string(), "Hang", "R"),
                ("2024-03-15".to_string(), "Pinch", "L"),
                ("2024-03-16".to_string(), "Hang", "L"),
            ]
        );
    }

    #[test]
    fn test_missing_measure_is_none() {
        let rows = vec![row("2024-03-15 10:00:00", "Hang", "L", 1, Measure::Peak, 5.0)];
        let out = daily(&rows);

        assert_eq!(out[0].mean_avg, None);
        assert_eq!(out[0].reps, 0);
    }

    #[test]
    fn test_empty_table() {
        assert!(daily(&[]).is_empty());
    }

    // ==========================================================================
    // TEXT TABLE
    // ==========================================================================

    #[test]
    fn test_table_rendering() {
        let rows = vec![
            row("2024-03-15 10:00:00", "Hang", "L", 1, Measure::Avg, 10.0),
            row("2024-03-15 10:00:00", "Hang", "L", 1, Measure::Peak, 18.25),
        ];
        let mut buf = Vec::new();
        write_table(&mut buf, &daily(&rows)).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("DATE"));
        assert!(text.contains("18.25"));
        assert!(text.contains("10.00"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hang", 20), "Hang");
        assert_eq!(truncate("Half crimp repeaters long", 10), "Half cr...");
    }
}
