pub mod json_api;

pub use json_api::{
    handle_league_json, LeagueRequest, LeagueRequestType, LeagueResponse, LeagueResponseType,
    WeekResults, API_SCHEMA_VERSION,
};
