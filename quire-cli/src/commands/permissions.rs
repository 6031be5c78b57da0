use anyhow::Result;
use quire_core::rbac::{permissions_for, role_allows, Domain, Permission, Role};
use std::fmt::Write;

/// Render the catalog grouped by domain, or the permissions one role holds.
pub fn list(role: Option<&str>) -> Result<String> {
    let mut out = String::new();

    let granted = match role {
        Some(name) => {
            let role: Role = name.parse()?;
            writeln!(out, "{} ({} permissions)", role, permissions_for(Some(role)).len())?;
            Some(permissions_for(Some(role)))
        }
        None => None,
    };

    for domain in Domain::ALL {
        let entries: Vec<Permission> = Permission::in_domain(*domain)
            .filter(|p| granted.map_or(true, |set| set.contains(*p)))
            .collect();
        if entries.is_empty() {
            continue;
        }

        writeln!(out, "[{}]", domain.as_str())?;
        for p in entries {
            writeln!(out, "  {:<28} {}", p.identifier(), p.description())?;
        }
    }

    Ok(out)
}

/// Whether `role` holds `permission`, by their text names.
pub fn check(role: &str, permission: &str) -> Result<bool> {
    Ok(role_allows(role, permission)?)
}
