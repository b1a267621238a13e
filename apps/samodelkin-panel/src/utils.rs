// Helpers for widget display strings (popovers show compact counts)

pub fn format_count_str(count: i64) -> String {
    if count < 0 {
        format!("-{}", format_count_str(-count))
    } else if count < 1_000 {
        format!("{}", count)
    } else if count < 1_000_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    }
}
