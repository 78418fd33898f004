use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};

/// Fixed role catalog. Roles are reference data: names resolve
/// case-insensitively against these variants and unknown names are rejected,
/// never created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    Customer,
    Admin,
    DeliveryDriver,
}

impl Role {
    /// Role granted when a registration supplies no roles at all.
    pub const DEFAULT: Role = Role::Customer;

    /// Resolve a full set of requested role names.
    ///
    /// An empty request yields the default role. Any unresolvable name fails
    /// the whole resolution, so a caller can abort without a partial set.
    pub fn resolve_all(names: &[String]) -> Result<Vec<Role>> {
        if names.is_empty() {
            return Ok(vec![Role::DEFAULT]);
        }

        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            let role = Role::from_str(name)
                .map_err(|_| AppError::NotFound(format!("Role '{}' Not Found", name)))?;
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Ok(roles)
    }
}
