//! Human-readable byte sizes, in binary (1024-based) units.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// `512 B`, `2.0 KB`, `2.5 MB`. Ties in the tenths place round up.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{} KB", one_decimal(bytes, KIB))
    } else {
        format!("{} MB", one_decimal(bytes, MIB))
    }
}

fn one_decimal(bytes: u64, unit: u64) -> String {
    let unit = u128::from(unit);
    let tenths = (u128::from(bytes) * 10 + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}
