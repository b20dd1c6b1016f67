//! League CLI rendering
//!
//! Plain-text tables for the terminal front end.

use std::collections::BTreeMap;
use std::fmt::Write;

use league_core::engine::ProbabilityRow;
use league_core::save::ProbabilityRecord;
use league_core::season::standings::StandingRow;
use league_core::season::MatchLine;

pub fn format_standings(rows: &[StandingRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}  {:<5} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Form", "Str"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>3}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4}  {:<5} {:>4}",
            row.position,
            row.name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points,
            row.form,
            row.strength
        );
    }
    out
}

pub fn format_probabilities(rows: &[ProbabilityRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "  {:<20} {:>6.2}%", row.name, row.percentage);
    }
    out
}

pub fn format_week(week: usize, matches: &[MatchLine]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Week {}", week);
    for m in matches {
        let score = if m.is_played {
            format!("{} - {}", m.home_goals, m.away_goals)
        } else {
            "v".to_string()
        };
        let marker = if m.is_fixed { " (fixed)" } else { "" };
        let _ = writeln!(out, "  {:>20} {:^7} {:<20}{}", m.home, score, m.away, marker);
    }
    out
}

/// One line per week with each team's percentage in a fixed column order.
pub fn format_history(history: &[ProbabilityRecord]) -> String {
    if history.is_empty() {
        return "No probability history\n".to_string();
    }

    let mut teams: Vec<&str> = Vec::new();
    for record in history {
        if !teams.contains(&record.team.as_str()) {
            teams.push(&record.team);
        }
    }

    let mut by_week: BTreeMap<usize, BTreeMap<&str, f64>> = BTreeMap::new();
    for record in history {
        by_week.entry(record.week).or_default().insert(&record.team, record.probability);
    }

    let mut out = String::new();
    let _ = write!(out, "{:>5}", "Week");
    for team in &teams {
        let _ = write!(out, " {:>18}", team);
    }
    out.push('\n');

    for (week, row) in by_week {
        let _ = write!(out, "{:>5}", week);
        for team in &teams {
            match row.get(team) {
                Some(p) => {
                    let _ = write!(out, " {:>17.2}%", p);
                }
                None => {
                    let _ = write!(out, " {:>18}", "-");
                }
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::models::TeamId;

    fn line(home: &str, away: &str, played: bool, fixed: bool) -> MatchLine {
        MatchLine {
            week: 1,
            index: 0,
            home: home.to_string(),
            away: away.to_string(),
            home_goals: 2,
            away_goals: 1,
            is_played: played,
            is_fixed: fixed,
        }
    }

    fn record(team: &str, week: usize, probability: f64) -> ProbabilityRecord {
        ProbabilityRecord { league_id: 1, team: team.to_string(), week, probability, calculated_at: 0 }
    }

    #[test]
    fn test_week_marks_fixed_and_unplayed() {
        let text = format_week(1, &[line("Arsenal", "Chelsea", true, true), line("Liverpool", "Brighton", false, false)]);
        assert!(text.starts_with("Week 1\n"));
        assert!(text.contains("2 - 1"));
        assert!(text.contains("(fixed)"));
        assert_eq!(text.matches("(fixed)").count(), 1);
        assert!(text.lines().nth(2).unwrap().contains(" v "));
    }

    #[test]
    fn test_probabilities_two_decimals() {
        let rows = vec![ProbabilityRow { team: TeamId(0), name: "Arsenal".to_string(), percentage: 62.5 }];
        assert!(format_probabilities(&rows).contains("62.50%"));
    }

    #[test]
    fn test_history_columns_follow_first_appearance() {
        let history = vec![
            record("Arsenal", 0, 25.0),
            record("Chelsea", 0, 75.0),
            record("Arsenal", 1, 40.0),
        ];
        let text = format_history(&history);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].find("Arsenal").unwrap() < lines[0].find("Chelsea").unwrap());
        assert!(lines[2].contains("40.00%"));
        assert!(lines[2].trim_end().ends_with('-'));
        assert_eq!(format_history(&[]), "No probability history\n");
    }
}
