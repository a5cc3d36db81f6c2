//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use partgroup_domain::{
    Assignment, GroupingOutcome, Groups, ObjectiveReport, PartId, SeedOutcome, SimilarityMatrix,
};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Optional sections of the group command output.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupSections {
    /// Include the full similarity matrix
    pub matrix: bool,
    /// Include seed selection and assignment steps
    pub steps: bool,
    /// Include within-group similarity matrices
    pub group_matrices: bool,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
    precision: usize,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
            precision: 3,
        }
    }

    /// Set the number of decimals for scores.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a full grouping run.
    pub fn format_outcome(&self, outcome: &GroupingOutcome, sections: GroupSections) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_outcome_json(outcome, sections),
            OutputFormat::Table => Ok(self.format_outcome_table(outcome, sections)),
            OutputFormat::Quiet => Ok(format_groups_quiet(&outcome.groups)),
        }
    }

    /// Format the similarity matrix.
    pub fn format_matrix(&self, matrix: &SimilarityMatrix) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&matrix_json(matrix))?),
            OutputFormat::Table => Ok(self.matrix_table(matrix, matrix.ids())),
            OutputFormat::Quiet => Ok(matrix
                .entries()
                .map(|((i, j), score)| format!("R[{},{}] = {}", i, j, self.score(score)))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a seed selection result.
    pub fn format_seeds(&self, seeds: &SeedOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&seeds_json(seeds))?),
            OutputFormat::Table => Ok(self.seeds_text(seeds)),
            OutputFormat::Quiet => Ok(join_ids(seeds.indicator.iter())),
        }
    }

    fn format_outcome_json(&self, outcome: &GroupingOutcome, sections: GroupSections) -> Result<String> {
        let mut doc = json!({
            "groups": groups_json(&outcome.groups, &outcome.report),
            "overall": outcome.report.overall,
            "seeds": seeds_json(&outcome.seeds),
        });

        if sections.steps {
            doc["assignments"] = trail_json(&outcome.trail);
        }
        if sections.matrix {
            doc["matrix"] = matrix_json(&outcome.matrix);
        }
        if sections.group_matrices {
            doc["group_matrices"] = group_matrices_json(&outcome.groups, &outcome.matrix);
        }

        Ok(serde_json::to_string_pretty(&doc)?)
    }

    fn format_outcome_table(&self, outcome: &GroupingOutcome, sections: GroupSections) -> String {
        let mut blocks = Vec::new();

        if sections.matrix {
            blocks.push(self.heading("Similarity matrix"));
            blocks.push(self.matrix_table(&outcome.matrix, outcome.matrix.ids()));
        }

        if sections.steps {
            blocks.push(self.heading("Seed selection"));
            blocks.push(self.seeds_text(&outcome.seeds));
            blocks.push(self.heading("Assignments"));
            blocks.push(self.trail_table(&outcome.trail));
        }

        blocks.push(self.heading("Groups"));
        blocks.push(self.groups_table(&outcome.groups, &outcome.report));

        if sections.group_matrices {
            for (index, members) in outcome.groups.iter().enumerate() {
                if members.len() > 1 {
                    blocks.push(self.heading(&format!("R matrix for group {}", index + 1)));
                    let ids: Vec<PartId> = members.iter().copied().collect();
                    blocks.push(self.matrix_table(&outcome.matrix, &ids));
                }
            }
        }

        blocks.push(self.summary(&outcome.report));
        blocks.join("\n")
    }

    /// Groups with their cohesion.
    fn groups_table(&self, groups: &Groups, report: &ObjectiveReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Group", "Size", "Members", "H"]);

        for (index, members) in groups.iter().enumerate() {
            let cohesion = report.cohesion(index).unwrap_or(0.0);
            builder.push_record([
                (index + 1).to_string(),
                members.len().to_string(),
                join_ids(members.iter().copied()),
                self.score(cohesion),
            ]);
        }

        self.render(builder)
    }

    /// Square matrix restricted to `ids`, with "-" on the diagonal.
    fn matrix_table(&self, matrix: &SimilarityMatrix, ids: &[PartId]) -> String {
        if ids.is_empty() {
            return self.colorize("No parts loaded.", "yellow");
        }

        let mut builder = Builder::default();
        let mut header = vec![String::new()];
        header.extend(ids.iter().map(ToString::to_string));
        builder.push_record(header);

        for &i in ids {
            let mut row = vec![i.to_string()];
            row.extend(ids.iter().map(|&j| {
                if i == j {
                    "-".to_string()
                } else {
                    self.score(matrix.get(i, j))
                }
            }));
            builder.push_record(row);
        }

        self.render(builder)
    }

    fn trail_table(&self, trail: &[Assignment]) -> String {
        if trail.is_empty() {
            return self.info("No parts left to assign.");
        }

        let mut builder = Builder::default();
        builder.push_record(["Step", "Part", "Group", "M"]);
        for (step, assignment) in trail.iter().enumerate() {
            builder.push_record([
                (step + 1).to_string(),
                assignment.part.to_string(),
                (assignment.group + 1).to_string(),
                self.score(assignment.score),
            ]);
        }

        self.render(builder)
    }

    fn seeds_text(&self, seeds: &SeedOutcome) -> String {
        let (first, second) = seeds.initial_pair;
        let mut lines = vec![
            format!(
                "Initial pair: ({}, {})  R = {}",
                first,
                second,
                self.score(seeds.initial_similarity)
            ),
            format!("Selection order: {}", join_ids(seeds.indicator.selection_order().iter().copied())),
            format!("Indicator group: {{{}}}", join_ids(seeds.indicator.iter())),
            format!("Remaining: {{{}}}", join_ids(seeds.remaining.iter())),
        ];

        if !seeds.is_complete() {
            lines.push(self.shortfall_warning(seeds));
        }

        lines.join("\n")
    }

    fn summary(&self, report: &ObjectiveReport) -> String {
        self.colorize(&format!("Overall H = {}", self.score(report.overall)), "cyan")
    }

    /// Warning for a seed selection that ran out of parts.
    pub fn shortfall_warning(&self, seeds: &SeedOutcome) -> String {
        self.warning(&format!(
            "Only {} of {} requested seeds could be selected",
            seeds.indicator.len(),
            seeds.requested()
        ))
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn heading(&self, title: &str) -> String {
        if self.color_enabled {
            format!("\n{}", title.bold())
        } else {
            format!("\n{}", title)
        }
    }

    fn score(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn join_ids<I: Iterator<Item = PartId>>(ids: I) -> String {
    ids.map(|id| id.to_string()).collect::<Vec<_>>().join(" ")
}

fn id_list<'a, I: IntoIterator<Item = &'a PartId>>(ids: I) -> Vec<u64> {
    ids.into_iter().map(PartId::value).collect()
}

/// One group per line, ids separated by spaces.
fn format_groups_quiet(groups: &Groups) -> String {
    groups
        .iter()
        .map(|members| join_ids(members.iter().copied()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn groups_json(groups: &Groups, report: &ObjectiveReport) -> Value {
    Value::Array(
        groups
            .iter()
            .enumerate()
            .map(|(index, members): (usize, &BTreeSet<PartId>)| {
                json!({
                    "group": index + 1,
                    "members": id_list(members),
                    "cohesion": report.cohesion(index).unwrap_or(0.0),
                })
            })
            .collect(),
    )
}

fn seeds_json(seeds: &SeedOutcome) -> Value {
    json!({
        "initial_pair": [seeds.initial_pair.0.value(), seeds.initial_pair.1.value()],
        "initial_similarity": seeds.initial_similarity,
        "selection_order": id_list(seeds.indicator.selection_order()),
        "indicator": seeds.indicator.iter().map(|id| id.value()).collect::<Vec<_>>(),
        "remaining": seeds.remaining.iter().map(|id| id.value()).collect::<Vec<_>>(),
        "requested": seeds.requested(),
        "produced": seeds.indicator.len(),
    })
}

fn trail_json(trail: &[Assignment]) -> Value {
    Value::Array(
        trail
            .iter()
            .map(|a| {
                json!({
                    "part": a.part.value(),
                    "group": a.group + 1,
                    "score": a.score,
                })
            })
            .collect(),
    )
}

fn matrix_json(matrix: &SimilarityMatrix) -> Value {
    Value::Array(
        matrix
            .entries()
            .map(|((i, j), score)| json!({ "i": i.value(), "j": j.value(), "similarity": score }))
            .collect(),
    )
}

/// Within-group R(p,k) entries for every group with more than one member.
fn group_matrices_json(groups: &Groups, matrix: &SimilarityMatrix) -> Value {
    Value::Array(
        groups
            .iter()
            .enumerate()
            .filter(|(_, members)| members.len() > 1)
            .map(|(index, members)| {
                let entries: Vec<Value> = members
                    .iter()
                    .flat_map(|&p| members.iter().filter(move |&&k| k != p).map(move |&k| (p, k)))
                    .map(|(p, k)| json!({ "i": p.value(), "j": k.value(), "similarity": matrix.get(p, k) }))
                    .collect();
                json!({ "group": index + 1, "entries": entries })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use partgroup_domain::{Dataset, GroupingConfig, GroupingPipeline};

    fn outcome(seeds: usize) -> GroupingOutcome {
        let dataset = Dataset::from_rows(vec![
            vec!["A", "B", "C"],
            vec!["A", "B", "D"],
            vec!["X", "Y", "Z"],
            vec!["X", "Y", "W"],
        ]);
        GroupingPipeline::new(GroupingConfig::with_seed_count(seeds))
            .run(&dataset)
            .unwrap()
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_outcome(&outcome(2), GroupSections::default()).unwrap();
        assert!(output.contains("Members"));
        assert!(output.contains("1 2"));
        assert!(output.contains("3 4"));
        assert!(output.contains("Overall H = 0.500"));
        assert!(!output.contains("Similarity matrix"));
    }

    #[test]
    fn test_table_sections() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let sections = GroupSections {
            matrix: true,
            steps: true,
            group_matrices: true,
        };
        let output = formatter.format_outcome(&outcome(2), sections).unwrap();
        assert!(output.contains("Similarity matrix"));
        assert!(output.contains("Initial pair: (1, 3)"));
        assert!(output.contains("Assignments"));
        assert!(output.contains("R matrix for group 2"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let sections = GroupSections {
            steps: true,
            ..Default::default()
        };
        let output = formatter.format_outcome(&outcome(2), sections).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["overall"], json!(0.5));
        assert_eq!(value["groups"][0]["members"], json!([1, 2]));
        assert_eq!(value["groups"][1]["cohesion"], json!(0.5));
        assert_eq!(value["seeds"]["initial_pair"], json!([1, 3]));
        assert_eq!(value["assignments"].as_array().unwrap().len(), 2);
        assert!(value.get("matrix").is_none());
    }

    #[test]
    fn test_json_group_matrices() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let sections = GroupSections {
            group_matrices: true,
            ..Default::default()
        };
        let output = formatter.format_outcome(&outcome(2), sections).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        let blocks = value["group_matrices"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1]["group"], json!(2));
        assert_eq!(
            blocks[0]["entries"],
            json!([
                {"i": 1, "j": 2, "similarity": 0.5},
                {"i": 2, "j": 1, "similarity": 0.5}
            ])
        );
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_outcome(&outcome(2), GroupSections::default()).unwrap();
        assert_eq!(output, "1 2\n3 4");
    }

    #[test]
    fn test_matrix_quiet_lists_pairs() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_matrix(&outcome(2).matrix).unwrap();
        assert_eq!(output.lines().count(), 12);
        assert!(output.starts_with("R[1,2] = 0.500"));
    }

    #[test]
    fn test_matrix_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_matrix(&outcome(2).matrix).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 12);
        assert_eq!(value[0], json!({"i": 1, "j": 2, "similarity": 0.5}));
    }

    #[test]
    fn test_seeds_shortfall_warning() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_seeds(&outcome(6).seeds).unwrap();
        assert!(output.contains("Only 4 of 6 requested seeds"));
    }

    #[test]
    fn test_precision() {
        let formatter = Formatter::new(OutputFormat::Table, false).with_precision(1);
        let output = formatter.format_outcome(&outcome(2), GroupSections::default()).unwrap();
        assert!(output.contains("Overall H = 0.5"));
        assert!(!output.contains("0.500"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
