//! Compile-time registry of well-known two-letter SAM tags and their
//! canonical on-wire type, used when [`super::set`] is called without an
//! explicit type override.
//!
//! Carried as a sorted `const` array plus binary search rather than a
//! runtime `HashMap`: the table is fixed at compile time, so there is no
//! reason to build it on every process start.

/// `(tag, type letter, array subtype)`, sorted by tag for binary search.
/// The subtype byte is only meaningful when the type letter is `B`; it is
/// `0` for every scalar entry.
const REGISTRY: &[([u8; 2], u8, u8)] = &[
    (*b"AM", b'i', 0),
    (*b"AS", b'i', 0),
    (*b"BC", b'Z', 0),
    (*b"BQ", b'Z', 0),
    (*b"BZ", b'Z', 0),
    (*b"CB", b'Z', 0),
    (*b"CC", b'Z', 0),
    (*b"CG", b'B', b'I'),
    (*b"CM", b'i', 0),
    (*b"CO", b'Z', 0),
    (*b"CP", b'i', 0),
    (*b"CQ", b'Z', 0),
    (*b"CR", b'Z', 0),
    (*b"CS", b'Z', 0),
    (*b"CT", b'Z', 0),
    (*b"CY", b'Z', 0),
    (*b"E2", b'Z', 0),
    (*b"FI", b'i', 0),
    (*b"FS", b'Z', 0),
    (*b"FZ", b'B', b'S'),
    (*b"GC", b'i', 0),
    (*b"GQ", b'Z', 0),
    (*b"GS", b'Z', 0),
    (*b"H0", b'i', 0),
    (*b"H1", b'i', 0),
    (*b"H2", b'i', 0),
    (*b"HI", b'i', 0),
    (*b"IH", b'i', 0),
    (*b"LB", b'Z', 0),
    (*b"MC", b'Z', 0),
    (*b"MD", b'Z', 0),
    (*b"MF", b'i', 0),
    (*b"MI", b'Z', 0),
    (*b"ML", b'B', b'C'),
    (*b"MQ", b'i', 0),
    (*b"NH", b'i', 0),
    (*b"NM", b'i', 0),
    (*b"OA", b'Z', 0),
    (*b"OC", b'Z', 0),
    (*b"OP", b'i', 0),
    (*b"OQ", b'Z', 0),
    (*b"OX", b'Z', 0),
    (*b"PG", b'Z', 0),
    (*b"PQ", b'i', 0),
    (*b"PT", b'Z', 0),
    (*b"PU", b'Z', 0),
    (*b"Q2", b'Z', 0),
    (*b"QT", b'Z', 0),
    (*b"QX", b'Z', 0),
    (*b"R2", b'Z', 0),
    (*b"RG", b'Z', 0),
    (*b"RT", b'Z', 0),
    (*b"RX", b'Z', 0),
    (*b"SA", b'Z', 0),
    (*b"SM", b'i', 0),
    (*b"SQ", b'Z', 0),
    (*b"TC", b'i', 0),
    (*b"TS", b'A', 0),
    (*b"U2", b'Z', 0),
    (*b"UB", b'Z', 0),
    (*b"UQ", b'i', 0),
];

/// Looks up the canonical on-wire type for a well-known tag name, returning
/// `(type letter, array subtype)`. The subtype is `0` for non-`B` types.
#[must_use]
pub fn lookup(tag: [u8; 2]) -> Option<(u8, u8)> {
    REGISTRY
        .binary_search_by_key(&tag, |(name, _, _)| *name)
        .ok()
        .map(|i| (REGISTRY[i].1, REGISTRY[i].2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_binary_search() {
        assert!(REGISTRY.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn known_tags_resolve() {
        assert_eq!(lookup(*b"NM"), Some((b'i', 0)));
        assert_eq!(lookup(*b"MD"), Some((b'Z', 0)));
        assert_eq!(lookup(*b"CG"), Some((b'B', b'I')));
        assert_eq!(lookup(*b"TS"), Some((b'A', 0)));
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(lookup(*b"ZZ"), None);
    }
}
