//! Exact, case-insensitive name lookup
//!
//! A lookup only succeeds when exactly one candidate matches. Duplicate
//! matches are reported the same way as no match, so a control request is
//! never routed to an arbitrary one of several equally named targets.

use crate::client::{Appliance, Signal};

/// Something that can be looked up by a human-facing name
pub trait NamedItem {
    /// Primary display name
    fn name(&self) -> Option<&str> {
        None
    }

    /// Fallback display name, used when [`NamedItem::name`] is absent
    fn nickname(&self) -> Option<&str> {
        None
    }
}

impl NamedItem for Signal {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl NamedItem for Appliance {
    fn nickname(&self) -> Option<&str> {
        Some(&self.nickname)
    }
}

/// Trim surrounding whitespace and lowercase
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Find the single item whose normalized name equals the normalized target
///
/// Returns `None` when nothing matches and when more than one item matches.
pub fn find_single_by_name<'a, T: NamedItem>(items: &'a [T], target: &str) -> Option<&'a T> {
    let target = normalize(target);
    let mut matches = items.iter().filter(|item| {
        let candidate = item.name().or_else(|| item.nickname()).unwrap_or("");
        normalize(candidate) == target
    });

    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}
