//! Type-safe wizard vocabulary
//!
//! The role a user signs up as and the seven steps of the signup flow are
//! proper enums instead of loose strings and integers, so an impossible role or
//! an out-of-range step cannot be represented.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

use crate::form_data::FormField;

/// Role chosen on the first step; decides which steps are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum UserType {
    /// No role picked yet. Persisted as the empty string.
    #[default]
    #[serde(rename = "", alias = "unset")]
    #[strum(to_string = "unset", serialize = "")]
    Unset,
    /// Someone looking for a boarding place
    #[serde(rename = "boarding_finder")]
    #[strum(serialize = "boarding_finder")]
    BoardingFinder,
    /// Someone listing a boarding place
    #[serde(rename = "boarding_owner")]
    #[strum(serialize = "boarding_owner")]
    BoardingOwner,
}

impl UserType {
    /// Returns true once a concrete role has been chosen
    #[inline]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Value written into the persisted form-data entry
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::BoardingFinder => "boarding_finder",
            Self::BoardingOwner => "boarding_owner",
        }
    }
}

/// Signup steps in presentation order.
///
/// Owners walk all seven. Finders go `RoleSelection -> Account -> Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(EnumIter)]
#[repr(u8)]
pub enum Step {
    /// Pick a role
    #[default]
    RoleSelection = 1,
    /// Name, email and password
    Account = 2,
    /// Public profile: username, description, picture
    Profile = 3,
    /// Phone number
    Contact = 4,
    /// Country, district, division, postal code
    Address = 5,
    /// National ID number and ID card images
    Verification = 6,
    /// Registration finished (terminal)
    Complete = 7,
}

impl Step {
    pub const FIRST: Step = Step::RoleSelection;
    pub const LAST: Step = Step::Complete;

    /// Total number of steps.
    pub const TOTAL_STEPS: u8 = 7;

    /// Returns the 1-based step number
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Converts a step number back into a step, `None` outside `1..=7`
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::RoleSelection),
            2 => Some(Self::Account),
            3 => Some(Self::Profile),
            4 => Some(Self::Contact),
            5 => Some(Self::Address),
            6 => Some(Self::Verification),
            7 => Some(Self::Complete),
            _ => None,
        }
    }

    /// The step with the next higher number, ignoring roles
    pub const fn following(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The step with the next lower number, ignoring roles
    pub const fn preceding(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Steps 3 through 6 only exist for boarding owners
    #[inline]
    pub const fn is_owner_only(self) -> bool {
        matches!(
            self,
            Self::Profile | Self::Contact | Self::Address | Self::Verification
        )
    }

    /// Display title for this step
    pub const fn title(self) -> &'static str {
        match self {
            Self::RoleSelection => "Choose your role",
            Self::Account => "Create your account",
            Self::Profile => "Profile details",
            Self::Contact => "Contact information",
            Self::Address => "Address",
            Self::Verification => "Identity verification",
            Self::Complete => "Registration complete",
        }
    }

    /// Form fields collected on this step
    pub const fn fields(self) -> &'static [FormField] {
        match self {
            Self::RoleSelection => &[FormField::UserType],
            Self::Account => &[
                FormField::FullName,
                FormField::Email,
                FormField::Password,
                FormField::ConfirmPassword,
            ],
            Self::Profile => &[
                FormField::Username,
                FormField::Description,
                FormField::ProfileImage,
            ],
            Self::Contact => &[FormField::Phone],
            Self::Address => &[
                FormField::Country,
                FormField::District,
                FormField::Division,
                FormField::PostalCode,
            ],
            Self::Verification => &[
                FormField::IdNumber,
                FormField::FrontImage,
                FormField::BackImage,
            ],
            Self::Complete => &[],
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = u8;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or(n)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
