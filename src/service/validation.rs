//! Field-level validation for incoming payloads.

use regex::Regex;

use crate::error::ApiError;
use crate::model::{LeagueInput, PlayerInput, TeamInput};

fn pattern(re: &str) -> Result<Regex, ApiError> {
    Regex::new(re).map_err(|_| ApiError::Validation(format!("invalid pattern {re}")))
}

pub fn validate_league(input: &LeagueInput) -> Result<(), ApiError> {
    if !pattern("^[A-Z]{2}$")?.is_match(&input.id) {
        return Err(ApiError::Validation(
            "league code must be 2 uppercase letters".into(),
        ));
    }
    if input.name.is_empty() {
        return Err(ApiError::Validation("league name is required".into()));
    }
    if input.name.len() > 50 {
        return Err(ApiError::Validation(
            "league name cannot be more than 50 characters long".into(),
        ));
    }
    Ok(())
}

pub fn validate_team(input: &TeamInput) -> Result<(), ApiError> {
    if input.name.is_empty() {
        return Err(ApiError::Validation("team name is required".into()));
    }
    if input.name.len() > 70 {
        return Err(ApiError::Validation(
            "team name cannot be more than 70 characters long".into(),
        ));
    }
    if matches!(input.name.chars().next(), Some('X' | 'F' | 'S')) {
        return Err(ApiError::Validation(
            "team names are not allowed to start with the letters X, F, or S".into(),
        ));
    }
    if !(500.0..=10_000.0).contains(&input.budget) {
        return Err(ApiError::Validation(
            "budget must be between 500 and 10000".into(),
        ));
    }
    if input.league_id.is_empty() {
        return Err(ApiError::Validation("a league must be selected".into()));
    }
    Ok(())
}

pub fn validate_player(input: &PlayerInput) -> Result<(), ApiError> {
    if input.first_name.is_empty() {
        return Err(ApiError::Validation("first name is required".into()));
    }
    if input.first_name.len() > 30 {
        return Err(ApiError::Validation(
            "first name cannot be more than 30 characters long".into(),
        ));
    }
    if input.last_name.is_empty() {
        return Err(ApiError::Validation("last name is required".into()));
    }
    if input.last_name.len() > 50 {
        return Err(ApiError::Validation(
            "last name cannot be more than 50 characters long".into(),
        ));
    }
    if !pattern("^\\d{2}$")?.is_match(&input.jersey) {
        return Err(ApiError::Validation(
            "jersey number must be 2 numeric digits".into(),
        ));
    }
    if input.email.len() > 255 {
        return Err(ApiError::Validation(
            "email cannot be more than 255 characters long".into(),
        ));
    }
    if !input.email.contains('@') || input.email.len() < 3 {
        return Err(ApiError::Validation("email must be a valid address".into()));
    }
    Ok(())
}
