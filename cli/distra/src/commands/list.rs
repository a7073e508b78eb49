//! `--listos` and `--listarch` — catalog queries.

use std::collections::BTreeMap;

use anyhow::Result;

use distra_core::Catalog;

/// Render the operating system list.
pub fn operating_systems(catalog: &Catalog, json: bool) -> Result<String> {
    if json {
        let oses: Vec<&str> = catalog.operating_systems().collect();
        return Ok(serde_json::to_string_pretty(&oses)?);
    }
    Ok(format!(
        "available operating systems: {}",
        catalog.operating_systems().collect::<Vec<_>>().join(", ")
    ))
}

/// Render the architectures for `oses`; `all` lists every OS.
pub fn architectures(catalog: &Catalog, oses: &[String], json: bool) -> Result<String> {
    let listing = catalog.lookup(oses)?;

    if json {
        let map: BTreeMap<&str, &[String]> = listing.entries.iter().copied().collect();
        return Ok(serde_json::to_string_pretty(&map)?);
    }

    let scope = if listing.all { "all" } else { "given" };
    let mut lines = vec![format!(
        "available architectures for {scope} operating systems:"
    )];
    for (os, archs) in &listing.entries {
        lines.push(format!("'{os}': {}", archs.join(", ")));
    }
    Ok(lines.join("\n"))
}
