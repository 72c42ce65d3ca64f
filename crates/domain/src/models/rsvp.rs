//! RSVP domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Hop count of a guest from the host's root invitation.
///
/// Always within `1..=3`. Degree 3 guests are leaves: they receive no
/// invitation code and are confirmed as soon as they attend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Degree(u8);

impl Degree {
    /// Degree of a direct or root-link submission.
    pub const ROOT: Degree = Degree(1);
    /// Deepest degree allowed in a chain.
    pub const MAX: Degree = Degree(3);

    pub fn get(self) -> u8 {
        self.0
    }

    /// The degree of someone invited by a guest of this degree, if allowed.
    pub fn next(self) -> Option<Degree> {
        if self < Self::MAX {
            Some(Degree(self.0 + 1))
        } else {
            None
        }
    }

    /// Returns true if guests of this degree are issued invitation codes.
    pub fn can_invite(self) -> bool {
        self < Self::MAX
    }

    /// Returns true for the deepest degree.
    pub fn is_leaf(self) -> bool {
        self == Self::MAX
    }

    /// Ordinal label used in guest-facing copy ("2nd").
    pub fn ordinal(self) -> &'static str {
        match self.0 {
            1 => "1st",
            2 => "2nd",
            _ => "3rd",
        }
    }
}

impl TryFrom<i16> for Degree {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if (Self::ROOT.0 as i16..=Self::MAX.0 as i16).contains(&value) {
            Ok(Degree(value as u8))
        } else {
            Err(format!("Degree out of range: {}", value))
        }
    }
}

impl From<Degree> for i16 {
    fn from(degree: Degree) -> Self {
        degree.0 as i16
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derived lifecycle state of an RSVP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    /// Not attending. Terminal.
    Declined,
    /// Attending, waiting for a direct invitee to attend.
    Pending,
    /// Attending and counted. Terminal.
    Confirmed,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Declined => "declined",
            RsvpStatus::Pending => "pending",
            RsvpStatus::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One guest's response to a party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rsvp {
    pub id: Uuid,
    pub party_id: Uuid,
    pub guest_name: String,
    /// Normalized E.164 phone number.
    pub guest_contact: String,
    pub is_attending: bool,
    pub degree: Degree,
    /// Inviting RSVP. `None` only for degree 1.
    pub invited_by_rsvp_id: Option<Uuid>,
    /// Current unredeemed code this guest can hand to an invitee.
    pub invitation_code: Option<String>,
    pub is_confirmed: bool,
    /// Direct invitee whose attendance confirmed this RSVP.
    pub confirmed_by_rsvp_id: Option<Uuid>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Rsvp {
    pub fn status(&self) -> RsvpStatus {
        if !self.is_attending {
            RsvpStatus::Declined
        } else if self.is_confirmed {
            RsvpStatus::Confirmed
        } else {
            RsvpStatus::Pending
        }
    }

    /// Returns true if this RSVP is eligible to hold an invitation code.
    pub fn can_invite(&self) -> bool {
        self.is_attending && self.degree.can_invite()
    }

    pub fn is_root(&self) -> bool {
        self.invited_by_rsvp_id.is_none()
    }
}

/// Values for a new RSVP row. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewRsvp {
    pub party_id: Uuid,
    pub guest_name: String,
    pub guest_contact: String,
    pub is_attending: bool,
    pub degree: Degree,
    pub invited_by_rsvp_id: Option<Uuid>,
}

impl NewRsvp {
    /// Attending leaves are confirmed at creation; everyone else starts unconfirmed.
    pub fn initially_confirmed(&self) -> bool {
        self.is_attending && self.degree.is_leaf()
    }
}

/// Guest-submitted RSVP payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRsvpRequest {
    #[validate(custom(function = "shared::validation::validate_guest_name"))]
    pub guest_name: String,

    #[validate(custom(function = "shared::validation::validate_contact"))]
    pub guest_contact: String,

    pub is_attending: bool,
}

impl SubmitRsvpRequest {
    pub fn new(guest_name: impl Into<String>, guest_contact: impl Into<String>, is_attending: bool) -> Self {
        Self {
            guest_name: guest_name.into(),
            guest_contact: guest_contact.into(),
            is_attending,
        }
    }
}
