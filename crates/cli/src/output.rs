//! Rendering of analytics results as JSON, aligned tables or plain tab-separated rows.

use std::fmt::Write;

use clap::ValueEnum;
use ironlog_domain::{
    ExerciseTemplate, PersonalRecord, Progress, Routine, RoutineFolder, Summary,
};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(
    strum::Display,
    ValueEnum,
    Serialize,
    Deserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub format: OutputFormat,
    pub color: bool,
}

/// Rows with a header, rendered according to the output format.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: vec![],
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = self
            .headers
            .iter()
            .map(|h| h.chars().count())
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }
        widths
    }

    #[must_use]
    pub fn aligned(&self, color: bool) -> String {
        let widths = self.widths();
        let mut result = String::new();

        let header = pad(self.headers.iter().copied(), &widths);
        if color {
            let _ = writeln!(result, "{}", header.bold());
        } else {
            let _ = writeln!(result, "{header}");
        }
        let rule = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(result, "{rule}");
        for row in &self.rows {
            let _ = writeln!(result, "{}", pad(row.iter().map(String::as_str), &widths));
        }

        result
    }

    #[must_use]
    pub fn plain(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{}\n", row.join("\t")))
            .collect()
    }
}

fn pad<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

impl Output {
    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn render(
        &self,
        value: &serde_json::Value,
        title: &str,
        tables: &[Table],
    ) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value),
            OutputFormat::Table => Ok(format!(
                "{}\n\n{}",
                self.heading(title),
                tables
                    .iter()
                    .map(|t| t.aligned(self.color))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
            .trim_end()
            .to_string()),
            OutputFormat::Plain => Ok(tables
                .iter()
                .map(Table::plain)
                .collect::<String>()
                .trim_end()
                .to_string()),
        }
    }

    pub fn progress(&self, progress: &Progress) -> serde_json::Result<String> {
        let analysis = &progress.analysis;
        let value = json!({
            "exercise": progress.exercise,
            "metric": progress.metric.to_string(),
            "unit": progress.unit(),
            "data_points": progress
                .points
                .iter()
                .map(|p| json!({"date": p.date.to_string(), "value": p.value}))
                .collect::<Vec<_>>(),
            "analysis": {
                "starting_value": analysis.starting_value,
                "current_value": analysis.current_value,
                "absolute_change": analysis.absolute_change,
                "percent_change": analysis.percent_change,
                "trend": analysis.trend.to_string(),
            },
        });

        let mut points = Table::new(vec!["Date", "Value"]);
        for point in &progress.points {
            points.row(vec![point.date.to_string(), format!("{:.1}", point.value)]);
        }

        let mut trend = Table::new(vec!["Analysis", ""]);
        trend.row(vec![
            String::from("Starting"),
            format!("{:.1} {}", analysis.starting_value, progress.unit()),
        ]);
        trend.row(vec![
            String::from("Current"),
            format!("{:.1} {}", analysis.current_value, progress.unit()),
        ]);
        trend.row(vec![
            String::from("Change"),
            format!(
                "{:+.1} ({:+.1}%)",
                analysis.absolute_change, analysis.percent_change
            ),
        ]);
        trend.row(vec![String::from("Trend"), analysis.trend.to_string()]);

        let title = format!(
            "Progress: {} ({}, {})",
            progress.exercise,
            progress.metric,
            progress.unit()
        );
        if self.format == OutputFormat::Plain {
            return self.render(&value, &title, &[points]);
        }
        self.render(&value, &title, &[points, trend])
    }

    pub fn records(&self, records: &[PersonalRecord]) -> serde_json::Result<String> {
        let value = json!({
            "personal_records": records
                .iter()
                .map(|r| json!({
                    "exercise": r.exercise,
                    "type": r.record_type.to_string(),
                    "value": r.value,
                    "unit": r.unit(),
                    "reps": r.reps.map(u32::from),
                    "date": r.date.to_string(),
                    "workout_id": r.workout_id.to_string(),
                }))
                .collect::<Vec<_>>(),
        });

        let mut table = Table::new(vec!["Exercise", "Type", "Value", "Reps", "Date"]);
        for record in records {
            table.row(vec![
                record.exercise.clone(),
                record.record_type.to_string(),
                format!("{:.1} {}", record.value, record.unit()),
                record.reps.map(|r| r.to_string()).unwrap_or_default(),
                record.date.to_string(),
            ]);
        }

        self.render(&value, "Personal Records", &[table])
    }

    pub fn routines(&self, routines: &[Routine]) -> serde_json::Result<String> {
        let value = json!({
            "routines": routines
                .iter()
                .map(|r| json!({
                    "id": r.id.to_string(),
                    "title": r.title,
                    "folder_id": r.folder_id.map(|id| *id),
                    "exercises": r.exercises.len(),
                    "sets": r.num_sets(),
                }))
                .collect::<Vec<_>>(),
            "count": routines.len(),
        });

        let mut table = Table::new(vec!["ID", "Title", "Exercises", "Sets", "Folder"]);
        for routine in routines {
            table.row(vec![
                routine.id.to_string(),
                routine.title.clone(),
                routine.exercises.len().to_string(),
                routine.num_sets().to_string(),
                routine
                    .folder_id
                    .map_or_else(|| String::from("-"), |id| id.to_string()),
            ]);
        }

        self.render(&value, "Routines", &[table])
    }

    pub fn routine_folders(&self, folders: &[RoutineFolder]) -> serde_json::Result<String> {
        let value = json!({
            "routine_folders": folders
                .iter()
                .map(|f| json!({
                    "id": *f.id,
                    "title": f.title,
                    "index": f.index,
                }))
                .collect::<Vec<_>>(),
            "count": folders.len(),
        });

        let mut table = Table::new(vec!["ID", "Title", "Index"]);
        for folder in folders {
            table.row(vec![
                folder.id.to_string(),
                folder.title.clone(),
                folder.index.to_string(),
            ]);
        }

        self.render(&value, "Routine Folders", &[table])
    }

    pub fn exercise_templates(
        &self,
        templates: &[ExerciseTemplate],
    ) -> serde_json::Result<String> {
        let value = json!({
            "exercise_templates": templates
                .iter()
                .map(|t| json!({
                    "id": t.id.to_string(),
                    "title": t.title,
                    "primary_muscle_group": t.primary_muscle_group,
                    "secondary_muscle_groups": t.secondary_muscle_groups,
                    "equipment": t.equipment,
                    "is_custom": t.is_custom,
                }))
                .collect::<Vec<_>>(),
            "count": templates.len(),
        });

        let mut table = Table::new(vec!["ID", "Title", "Primary Muscle", "Equipment", "Custom"]);
        for template in templates {
            table.row(vec![
                template.id.to_string(),
                template.title.clone(),
                template.primary_muscle_group.clone(),
                template.equipment.clone(),
                String::from(if template.is_custom { "Yes" } else { "No" }),
            ]);
        }

        self.render(&value, "Exercise Templates", &[table])
    }

    pub fn summary(&self, summary: &Summary) -> serde_json::Result<String> {
        let value = json!({
            "period": {
                "start": summary.start.to_string(),
                "end": summary.end.to_string(),
            },
            "workouts": {
                "total": summary.workouts.total,
                "average_duration_minutes": summary.workouts.average_duration_minutes,
                "total_duration_hours": summary.workouts.total_duration_hours,
            },
            "volume": {
                "total_kg": summary.volume.total_kg,
                "average_per_workout_kg": summary.volume.average_per_workout_kg,
            },
            "exercises": {
                "unique_count": summary.exercises.unique_count,
                "total_sets": summary.exercises.total_sets,
                "most_frequent": summary
                    .exercises
                    .most_frequent
                    .iter()
                    .map(|e| json!({"name": e.name, "count": e.count}))
                    .collect::<Vec<_>>(),
            },
            "consistency": {
                "workouts_per_week": summary.consistency.workouts_per_week,
                "longest_streak_days": summary.consistency.longest_streak_days,
                "current_streak_days": summary.consistency.current_streak_days,
            },
        });

        let mut stats = Table::new(vec!["Statistic", "Value"]);
        let mut add = |name: &str, value: String| stats.row(vec![name.to_string(), value]);
        add("Total workouts", summary.workouts.total.to_string());
        add(
            "Average duration",
            format!("{:.0} min", summary.workouts.average_duration_minutes),
        );
        add(
            "Total time",
            format!("{:.1} hours", summary.workouts.total_duration_hours),
        );
        add("Total volume", format!("{:.0} kg", summary.volume.total_kg));
        add(
            "Avg per workout",
            format!("{:.0} kg", summary.volume.average_per_workout_kg),
        );
        add(
            "Unique exercises",
            summary.exercises.unique_count.to_string(),
        );
        add("Total sets", summary.exercises.total_sets.to_string());
        add(
            "Workouts/week",
            format!("{:.1}", summary.consistency.workouts_per_week),
        );
        add(
            "Longest streak",
            format!("{} days", summary.consistency.longest_streak_days),
        );
        add(
            "Current streak",
            format!("{} days", summary.consistency.current_streak_days),
        );

        let mut frequent = Table::new(vec!["Most frequent", "Count"]);
        for exercise in &summary.exercises.most_frequent {
            frequent.row(vec![exercise.name.clone(), exercise.count.to_string()]);
        }

        let title = format!("Workout Summary ({} to {})", summary.start, summary.end);
        if frequent.rows.is_empty() {
            return self.render(&value, &title, &[stats]);
        }
        self.render(&value, &title, &[stats, frequent])
    }
}
