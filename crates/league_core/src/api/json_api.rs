use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::probability::{ProbabilityRow, ProjectionMethod};
use crate::save::{LeagueStore, ProbabilityRecord};
use crate::season::standings::StandingRow;
use crate::season::MatchLine;
use crate::state::{LeagueSession, SessionUpdate};

pub const API_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct LeagueRequest {
    pub schema_version: u8,
    pub request_type: LeagueRequestType,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum LeagueRequestType {
    GetStandings,
    GetProbabilities,
    GetWeek { week: usize },
    GetUpcoming,
    GetAllResults,
    GetHistory,
    /// Goals arrive as raw text and are validated here
    OverrideResult { week: usize, match_index: usize, home_goals: String, away_goals: String },
    AdvanceWeek,
    AdvanceToEnd,
}

#[derive(Debug, Serialize)]
pub struct LeagueResponse {
    pub schema_version: u8,
    pub success: bool,
    pub response_type: Option<LeagueResponseType>,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeekResults {
    pub week: usize,
    pub matches: Vec<MatchLine>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum LeagueResponseType {
    Standings { week: usize, rows: Vec<StandingRow> },
    Probabilities { week: usize, method: ProjectionMethod, rows: Vec<ProbabilityRow> },
    Week(WeekResults),
    Upcoming(WeekResults),
    AllResults { weeks: Vec<WeekResults> },
    History { snapshots: Vec<ProbabilityRecord> },
    /// Reply to any mutation: the weeks played (possibly none) and the new tables
    Updated {
        played: Vec<WeekResults>,
        standings: Vec<StandingRow>,
        probabilities: Vec<ProbabilityRow>,
        champions: Vec<String>,
        persist_errors: Vec<String>,
    },
    SeasonComplete { champions: Vec<String> },
}

impl LeagueResponse {
    fn ok(response_type: LeagueResponseType) -> Self {
        Self {
            schema_version: API_SCHEMA_VERSION,
            success: true,
            response_type: Some(response_type),
            error_message: None,
        }
    }

    fn failed(message: impl std::fmt::Display) -> Self {
        Self {
            schema_version: API_SCHEMA_VERSION,
            success: false,
            response_type: None,
            error_message: Some(message.to_string()),
        }
    }
}

/// Handle one JSON request against a live session.
///
/// Malformed JSON and unsupported schema versions are returned as `Err`;
/// domain failures (bad score, unknown match) come back as a response with
/// `success: false`.
pub fn handle_league_json<S: LeagueStore>(
    session: &mut LeagueSession<S>,
    request_json: &str,
) -> Result<String, String> {
    let request: LeagueRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != API_SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    debug!(request = ?request.request_type, "league request");
    let response = handle_request(session, request.request_type);
    if let Some(message) = &response.error_message {
        warn!(error = %message, "league request failed");
    }

    serde_json::to_string(&response).map_err(|e| format!("Failed to serialize response: {}", e))
}

fn handle_request<S: LeagueStore>(
    session: &mut LeagueSession<S>,
    request: LeagueRequestType,
) -> LeagueResponse {
    match request {
        LeagueRequestType::GetStandings => LeagueResponse::ok(LeagueResponseType::Standings {
            week: session.played_weeks(),
            rows: session.standings(),
        }),

        LeagueRequestType::GetProbabilities => {
            LeagueResponse::ok(LeagueResponseType::Probabilities {
                week: session.played_weeks(),
                method: session.odds().method,
                rows: session.probabilities(),
            })
        }

        LeagueRequestType::GetWeek { week } => {
            if week == 0 || week > session.season().total_weeks() {
                return LeagueResponse::failed(format!(
                    "week must be 1..={}, got {}",
                    session.season().total_weeks(),
                    week
                ));
            }
            LeagueResponse::ok(LeagueResponseType::Week(WeekResults {
                week,
                matches: session.matches_for_week(week),
            }))
        }

        LeagueRequestType::GetUpcoming => match session.upcoming() {
            Some((week, matches)) => {
                LeagueResponse::ok(LeagueResponseType::Upcoming(WeekResults { week, matches }))
            }
            None => LeagueResponse::ok(LeagueResponseType::SeasonComplete {
                champions: session.champions(),
            }),
        },

        LeagueRequestType::GetAllResults => LeagueResponse::ok(LeagueResponseType::AllResults {
            weeks: session
                .all_results()
                .into_iter()
                .map(|(week, matches)| WeekResults { week, matches })
                .collect(),
        }),

        LeagueRequestType::GetHistory => {
            LeagueResponse::ok(LeagueResponseType::History { snapshots: session.history() })
        }

        LeagueRequestType::OverrideResult { week, match_index, home_goals, away_goals } => {
            match session.override_result_text(week, match_index, &home_goals, &away_goals) {
                Ok(update) => updated(session, vec![update]),
                Err(err) => LeagueResponse::failed(err),
            }
        }

        LeagueRequestType::AdvanceWeek => match session.advance_week() {
            Some(update) => updated(session, vec![update]),
            None => LeagueResponse::ok(LeagueResponseType::SeasonComplete {
                champions: session.champions(),
            }),
        },

        LeagueRequestType::AdvanceToEnd => {
            let updates = session.advance_to_end();
            updated(session, updates)
        }
    }
}

fn updated<S: LeagueStore>(session: &LeagueSession<S>, updates: Vec<SessionUpdate>) -> LeagueResponse {
    let mut played = Vec::new();
    let mut persist_errors = Vec::new();
    for update in updates {
        if let Some(report) = update.report {
            played.push(WeekResults { week: report.week, matches: report.results });
        }
        if let Some(err) = update.persist_error {
            persist_errors.push(err.to_string());
        }
    }

    LeagueResponse::ok(LeagueResponseType::Updated {
        played,
        standings: session.standings(),
        probabilities: session.probabilities(),
        champions: session.champions(),
        persist_errors,
    })
}
