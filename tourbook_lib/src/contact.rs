//! Booking requests sent to the tour operator through a Telegram deep link.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use tourbook_api::types::TourID;

use crate::error::TourbookError;
use crate::validation::validate_name;

const TELEGRAM_BASE: &str = "https://t.me/";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContactRequest {
    pub tour_id: TourID,
    pub tour_title: String,
    pub name: String,
    pub phone: String,
    pub date: Option<NaiveDate>,
    pub guests: u32,
}

impl ContactRequest {
    /// Checks the visitor's input: a name, a plausible phone number and at least one guest.
    pub fn validate(&self) -> Result<(), TourbookError> {
        validate_name(&self.name)?;
        let phone_re = Regex::new(r"^\+?[0-9 ()-]{7,20}$")
            .map_err(|e| TourbookError::Config(format!("regex compile error: {}", e)))?;
        if !phone_re.is_match(self.phone.trim()) {
            return Err(TourbookError::InvalidInput(format!(
                "'{}' does not look like a phone number",
                self.phone
            )));
        }
        if self.guests < 1 {
            return Err(TourbookError::InvalidInput(
                "at least one guest is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Message text the operator receives.
    pub fn message(&self) -> String {
        let mut lines = vec![
            format!("Tour: {} (#{})", self.tour_title.trim(), self.tour_id),
            format!("Name: {}", self.name.trim()),
            format!("Phone: {}", self.phone.trim()),
        ];
        if let Some(date) = self.date {
            lines.push(format!("Date: {}", date.format("%d.%m.%Y")));
        }
        lines.push(format!("Guests: {}", self.guests));
        lines.join("\n")
    }

    /// Validates the request and builds `https://t.me/<username>?text=<message>`.
    pub fn telegram_link(&self, username: &str) -> Result<String, TourbookError> {
        self.validate()?;
        let username = validate_username(username)?;
        // form encoding writes spaces as '+'; a literal '+' is already %2B.
        let text: String = form_urlencoded::byte_serialize(self.message().as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        Ok(format!("{}{}?text={}", TELEGRAM_BASE, username, text))
    }
}

/// Telegram usernames: 5-32 characters of letters, digits and underscores.
/// A leading `@` is accepted and stripped.
pub fn validate_username(input: &str) -> Result<&str, TourbookError> {
    let username = input.trim().trim_start_matches('@');
    let re = Regex::new(r"^[A-Za-z0-9_]{5,32}$")
        .map_err(|e| TourbookError::Config(format!("regex compile error: {}", e)))?;
    if !re.is_match(username) {
        return Err(TourbookError::InvalidInput(format!(
            "invalid Telegram username '{}'",
            input
        )));
    }
    Ok(username)
}
