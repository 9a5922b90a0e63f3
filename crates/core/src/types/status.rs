//! Status enums for menu items and staff.

use serde::{Deserialize, Serialize};

/// Dietary classification of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodType {
    #[default]
    Veg,
    NonVeg,
}

impl FoodType {
    /// Wire representation (`VEG` / `NON_VEG`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Veg => "VEG",
            Self::NonVeg => "NON_VEG",
        }
    }
}

impl std::fmt::Display for FoodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Availability of a menu item, as toggled from the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Enabled,
    Disabled,
}

impl ItemStatus {
    /// Map the backend's boolean flag to a status.
    #[must_use]
    pub const fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }

    /// Whether customers can order the item.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Enabled => Self::Disabled,
            Self::Disabled => Self::Enabled,
        }
    }
}

/// Staff role carried in access-token claims.
///
/// Ordered by privilege so the highest role in a claim set wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Manages the menu of the restaurants they belong to.
    Admin,
    /// Manages every restaurant, including creating new ones.
    SuperAdmin,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    /// Accepts `super_admin`, `SUPER_ADMIN`, `ROLE_SUPER_ADMIN`, `super-admin`
    /// and the same spellings of `admin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = normalized.strip_prefix("role_").unwrap_or(&normalized);
        match normalized {
            "super_admin" | "superadmin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid staff role: {s}")),
        }
    }
}
