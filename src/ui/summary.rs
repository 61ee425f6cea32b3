use crate::analysis::PriceProfile;

const DATE_FMT: &str = "%Y-%m-%d %H:%M";

/// Key/value block describing one analysed ticker.
pub fn format_profile(ticker: &str, period: &str, interval: &str, profile: &PriceProfile) -> String {
    let rows = [
        ("Ticker", ticker.to_string()),
        ("Period / interval", format!("{period} / {interval}")),
        ("Bars", profile.bars.to_string()),
        (
            "Span",
            format!(
                "{} -> {}",
                profile.first.format(DATE_FMT),
                profile.last.format(DATE_FMT)
            ),
        ),
        ("First open", format!("{:.2}", profile.first_open)),
        ("Last close", format!("{:.2}", profile.last_close)),
        ("Change", format!("{:+.2}%", profile.change_pct)),
        (
            "Period high",
            format!("{:.2} on {}", profile.high, profile.high_at.format(DATE_FMT)),
        ),
        (
            "Period low",
            format!("{:.2} on {}", profile.low, profile.low_at.format(DATE_FMT)),
        ),
        ("Mean volume", format!("{:.0}", profile.mean_volume)),
        ("Mean bar range", format!("{:.2}%", profile.mean_range_pct)),
    ];

    let key_width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| format!("  {key:<key_width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_profile(ticker: &str, period: &str, interval: &str, profile: &PriceProfile) {
    println!("{}", format_profile(ticker, period, interval, profile));
}
