use std::fmt::Write as _;

use devbox_core::{BoxConfig, Catalog};

/// One line per catalog item: id, strategy, smallest selection, size and name.
pub fn render(catalog: &Catalog, config: &BoxConfig) -> String {
    let mut out = String::new();
    for entry in catalog.entries() {
        let provider = entry.instantiate(config);
        let info = provider.info();
        let _ = writeln!(
            out,
            "{:<12} {:<7} {:<8} {:<20} {}",
            entry.id,
            entry.kind.to_string(),
            entry.tier.to_string(),
            info.size.to_string(),
            info.description
        );
    }
    out
}
