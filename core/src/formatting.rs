use num_bigint::BigUint;
use num_traits::{pow, Zero};

/// Marker shown wherever an optional value is missing.
pub const PLACEHOLDER: &str = "--";
pub const ELLIPSIS: &str = "...";
/// Fractional digits kept when scaling base units into whole coins.
pub const AMOUNT_DISPLAY_DECIMALS: usize = 4;

const HUMAN_UNITS: [(u64, &str); 4] = [
    (1_000_000_000_000, "T"),
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

#[must_use]
pub fn prep_hex_str<S: AsRef<str>>(to_fix: S) -> String {
    let lc = to_fix.as_ref().trim().to_lowercase();
    if let Some(s) = lc.strip_prefix("0x") {
        s.to_string()
    } else {
        lc
    }
}

/// Shortens `value` to `budget` characters plus an ellipsis, keeping both ends.
/// A budget of 0 leaves the value untouched.
#[must_use]
pub fn truncate_middle(value: &str, budget: usize) -> String {
    let len = value.chars().count();
    if budget == 0 || len <= budget {
        return value.to_string();
    }
    let head = budget.div_ceil(2);
    let tail = budget / 2;
    let start: String = value.chars().take(head).collect();
    let end: String = value.chars().skip(len - tail).collect();
    format!("{start}{ELLIPSIS}{end}")
}

/// Inserts `,` every three digits of an unsigned decimal string.
#[must_use]
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// K/M/B/T suffixing with one truncated decimal, e.g. `1500 -> "1.5K"`.
#[must_use]
pub fn format_human(value: u64) -> String {
    for (unit, suffix) in HUMAN_UNITS {
        if value >= unit {
            let tenths = u128::from(value) * 10 / u128::from(unit);
            let whole = tenths / 10;
            let frac = tenths % 10;
            return if frac == 0 {
                format!("{whole}{suffix}")
            } else {
                format!("{whole}.{frac}{suffix}")
            };
        }
    }
    value.to_string()
}

/// Scales an integer amount of base units by `10^decimals` and appends `suffix`.
#[must_use]
pub fn format_amount(amount: &BigUint, decimals: u32, suffix: &str) -> String {
    let scale = pow(BigUint::from(10u32), decimals as usize);
    let whole = amount / &scale;
    let remainder = amount % &scale;
    let mut rendered = group_thousands(&whole.to_str_radix(10));
    if decimals > 0 && !remainder.is_zero() {
        let padded = format!(
            "{:0>width$}",
            remainder.to_str_radix(10),
            width = decimals as usize
        );
        let kept: String = padded.chars().take(AMOUNT_DISPLAY_DECIMALS).collect();
        let kept = kept.trim_end_matches('0');
        if kept.is_empty() {
            // non-zero but below display precision
            return format!("<0.{}1 {suffix}", "0".repeat(AMOUNT_DISPLAY_DECIMALS - 1));
        }
        rendered.push('.');
        rendered.push_str(kept);
    }
    format!("{rendered} {suffix}")
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Relative age label for a millisecond timestamp.
#[must_use]
pub fn time_ago(timestamp_ms: u64, now_ms: u64) -> String {
    let secs = now_ms.saturating_sub(timestamp_ms) / 1000;
    match secs {
        0 => "just now".to_string(),
        1..=59 => plural(secs, "sec"),
        60..=3_599 => plural(secs / 60, "min"),
        3_600..=86_399 => plural(secs / 3_600, "hour"),
        _ => plural(secs / 86_400, "day"),
    }
}
